//! Local directory entries served as table resources.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use livetable_lib::Context;
use livetable_lib::error::Error;
use livetable_lib::error::FetchError;
use livetable_lib::model::Align;
use livetable_lib::model::Header;
use livetable_lib::model::HeaderColumn;
use livetable_lib::model::Row;
use livetable_lib::model::age_decorator;
use livetable_lib::resource::Accessor;
use livetable_lib::resource::Describer;
use livetable_lib::resource::Factory;
use livetable_lib::resource::Object;
use livetable_lib::resource::Renderer;
use livetable_lib::resource::ResourceKind;
use livetable_lib::resource::ViewSetting;
use log::debug;
use serde_json::json;

/// Resource kind of directory entries.
pub fn files() -> ResourceKind {
    ResourceKind::new("local/v1/files")
}

/// Names the directory tree being watched.
pub struct LocalFactory {
    name: String,
}

impl LocalFactory {
    pub fn new(root: &Path) -> Self {
        Self {
            name: root.display().to_string(),
        }
    }
}

impl Factory for LocalFactory {
    fn context_name(&self) -> &str {
        &self.name
    }
}

/// Lists the entries of a directory below `root`.
///
/// The namespace is a subdirectory relative to `root`; a blank namespace lists
/// `root` itself. Entries carry `type` and `ext` labels for selectors.
pub struct FileAccessor {
    root: PathBuf,
    include_object: AtomicBool,
}

impl FileAccessor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include_object: AtomicBool::new(false),
        }
    }

    fn dir(&self, ns: &str) -> PathBuf {
        if ns.is_empty() {
            self.root.clone()
        } else {
            self.root.join(ns)
        }
    }

    async fn read_entries(&self, ctx: &Context, ns: &str) -> Result<Vec<Object>, FetchError> {
        let dir = self.dir(ns);
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|err| fetch_error(err, ns))?;

        let mut objects = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| fetch_error(err, ns))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = relative(ns, &name);
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                Err(err) => {
                    debug!("Skipping {path}: {err}");
                    continue;
                }
            };
            let object = self.object(&path, &name, &metadata);
            if let Some(sel) = ctx.labels() {
                if !sel.matches(&labels_of(&object)) {
                    continue;
                }
            }
            objects.push(object);
        }

        Ok(objects)
    }

    fn object(&self, path: &str, name: &str, metadata: &std::fs::Metadata) -> Object {
        let kind = if metadata.is_dir() { "dir" } else { "file" };
        let ext = Path::new(name)
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        let modified = metadata
            .modified()
            .map(|t| DateTime::<Utc>::from(t).to_rfc3339())
            .unwrap_or_default();

        let mut object = json!({
            "path": path,
            "name": name,
            "type": kind,
            "size": metadata.len(),
            "modified": modified,
            "labels": { "type": kind, "ext": ext },
        });
        if self.include_object.load(Ordering::Relaxed) {
            object["readonly"] = json!(metadata.permissions().readonly());
        }
        object
    }
}

#[async_trait]
impl Accessor for FileAccessor {
    fn init(&self, factory: Arc<dyn Factory>, kind: &ResourceKind) {
        debug!("Serving {kind} from {}", factory.context_name());
    }

    fn set_include_object(&self, include: bool) {
        self.include_object.store(include, Ordering::Relaxed);
    }

    async fn list(&self, ctx: &Context, ns: &str) -> Result<Vec<Object>, FetchError> {
        tokio::select! {
            _ = ctx.cancelled() => Err(FetchError::Cancelled),
            res = self.read_entries(ctx, ns) => res,
        }
    }

    async fn get(&self, _ctx: &Context, path: &str) -> Result<Object, FetchError> {
        let metadata = tokio::fs::metadata(self.root.join(path))
            .await
            .map_err(|err| fetch_error(err, path))?;
        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());

        Ok(self.object(path, &name, &metadata))
    }

    fn describer(&self) -> Option<&dyn Describer> {
        Some(self as &dyn Describer)
    }
}

#[async_trait]
impl Describer for FileAccessor {
    async fn describe(&self, ctx: &Context, path: &str) -> Result<String, Error> {
        let object = self.get(ctx, path).await?;
        let mut out = String::new();
        for key in ["path", "type", "size", "modified"] {
            out.push_str(&format!("{:<10}{}\n", format!("{key}:"), plain(&object[key])));
        }
        Ok(out)
    }

    async fn to_yaml(&self, ctx: &Context, path: &str) -> Result<String, Error> {
        let object = self.get(ctx, path).await?;
        serde_yaml::to_string(&object).map_err(|err| Error::render(path, err.to_string()))
    }
}

/// Renders directory entries as NAME, TYPE, SIZE and AGE columns.
#[derive(Default)]
pub struct FileRenderer;

impl Renderer for FileRenderer {
    fn header(&self, _ns: &str) -> Header {
        Header::new([
            HeaderColumn::new("NAME"),
            HeaderColumn::new("TYPE"),
            HeaderColumn::new("SIZE").align(Align::Right),
            HeaderColumn::new("AGE").time(true).decorator(age_decorator),
        ])
    }

    fn render(&self, object: &Object, _ns: &str) -> Result<Row, Error> {
        let path = object["path"]
            .as_str()
            .ok_or_else(|| Error::render("", "entry has no path"))?;

        Ok(Row::new(
            path,
            [
                plain(&object["name"]),
                plain(&object["type"]),
                plain(&object["size"]),
                plain(&object["modified"]),
            ],
        ))
    }

    fn set_view_setting(&self, _vs: Option<ViewSetting>) {}
}

fn relative(ns: &str, name: &str) -> String {
    if ns.is_empty() {
        name.to_string()
    } else {
        format!("{ns}/{name}")
    }
}

fn labels_of(object: &Object) -> BTreeMap<String, String> {
    object["labels"]
        .as_object()
        .map(|labels| {
            labels
                .iter()
                .map(|(k, v)| (k.clone(), plain(v)))
                .collect()
        })
        .unwrap_or_default()
}

fn plain(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn fetch_error(err: io::Error, path: &str) -> FetchError {
    match err.kind() {
        io::ErrorKind::NotFound => FetchError::not_found(&files(), path),
        io::ErrorKind::PermissionDenied => FetchError::forbidden(&files(), err.to_string()),
        _ => FetchError::transport(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_entry() {
        let object = json!({
            "path": "src/main.rs",
            "name": "main.rs",
            "type": "file",
            "size": 42,
            "modified": "2024-01-01T00:00:00+00:00",
        });
        let row = FileRenderer.render(&object, "src").unwrap();
        assert_eq!(row.id, "src/main.rs");
        assert_eq!(row.fields, vec!["main.rs", "file", "42", "2024-01-01T00:00:00+00:00"]);
        assert_eq!(row.len(), FileRenderer.header("src").len());
    }

    #[test]
    fn test_render_without_path_fails() {
        let err = FileRenderer.render(&json!({ "name": "x" }), "").unwrap_err();
        assert!(matches!(err, Error::Render { .. }));
    }

    #[test]
    fn test_labels_of() {
        let labels = labels_of(&json!({ "labels": { "type": "dir", "ext": "" } }));
        assert_eq!(labels.get("type").map(String::as_str), Some("dir"));
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_io_error_mapping() {
        let err = fetch_error(io::Error::from(io::ErrorKind::NotFound), "nope");
        assert!(matches!(err, FetchError::NotFound { .. }));
        let err = fetch_error(io::Error::other("boom"), "nope");
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_lists_cargo_manifest() {
        let accessor = FileAccessor::new(env!("CARGO_MANIFEST_DIR"));
        let objects = accessor.list(&Context::new(), "").await.unwrap();
        assert!(objects.iter().any(|o| o["name"] == "Cargo.toml"));

        let sel = "type=dir".parse().unwrap();
        let ctx = Context::new().with_labels(Some(sel));
        let dirs = accessor.list(&ctx, "").await.unwrap();
        assert!(dirs.iter().all(|o| o["type"] == "dir"));
        assert!(dirs.iter().any(|o| o["name"] == "src"));
    }

    #[tokio::test]
    async fn test_describe_entry() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        let accessor = FileAccessor::new(dir.path());

        let object = accessor.get(&Context::new(), "notes.txt").await.unwrap();
        assert_eq!(object["size"], 5);
        assert_eq!(object["labels"]["ext"], "txt");

        let out = accessor.describe(&Context::new(), "notes.txt").await.unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "path:     notes.txt");
        assert_eq!(lines[1], "type:     file");
        assert_eq!(lines[2], "size:     5");
        assert!(lines[3].starts_with("modified: "));
    }

    #[tokio::test]
    async fn test_yaml_quotes_awkward_names() {
        let dir = tempfile::tempdir().unwrap();
        let name = "a: b #c";
        std::fs::write(dir.path().join(name), b"").unwrap();
        let accessor = FileAccessor::new(dir.path());

        let yaml = accessor.to_yaml(&Context::new(), name).await.unwrap();
        let parsed: serde_json::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed["name"], name);
        assert_eq!(parsed["path"], name);
        assert_eq!(parsed["labels"]["type"], "file");
        assert_eq!(parsed["labels"]["ext"], "");
    }

    #[tokio::test]
    async fn test_describe_missing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let accessor = FileAccessor::new(dir.path());
        let err = accessor.to_yaml(&Context::new(), "gone").await.unwrap_err();
        assert!(matches!(err, Error::Fetch(FetchError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_missing_dir_is_not_found() {
        let accessor = FileAccessor::new(env!("CARGO_MANIFEST_DIR"));
        let err = accessor.list(&Context::new(), "does-not-exist").await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound { .. }));
    }
}
