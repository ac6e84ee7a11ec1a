//! Fakes shared by the table model integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use livetable_lib::error::{Error, FetchError};
use livetable_lib::model::{Header, HeaderColumn, Row, TableData, age_decorator};
use livetable_lib::namespace::is_cluster_wide;
use livetable_lib::resource::{
    Accessor, Describer, Factory, Grace, Nuker, Object, Propagation, Registry, Renderer,
    ResourceKind, ResourceMeta, ViewSetting,
};
use livetable_lib::{Context, TableListener};
use serde_json::json;
use tokio::sync::Notify;

pub fn pods() -> ResourceKind {
    ResourceKind::new("v1/pods")
}

pub fn pod(ns: &str, name: &str, status: &str) -> Object {
    json!({ "namespace": ns, "name": name, "status": status, "age": "3m" })
}

pub struct FakeFactory;

impl Factory for FakeFactory {
    fn context_name(&self) -> &str {
        "fake"
    }
}

pub fn context() -> Context {
    Context::new().with_factory(Arc::new(FakeFactory))
}

/// Blocks list calls until released.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

pub enum Mode {
    Serve(Vec<Object>),
    Fail,
}

pub struct FakeAccessor {
    pub mode: Mutex<Mode>,
    pub gate: Option<Arc<Gate>>,
    pub destructive: bool,
    pub failures_left: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
    pub inits: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub include_object: AtomicBool,
    pub namespaces: Mutex<Vec<String>>,
    pub labels: Mutex<Vec<Option<String>>>,
    pub deleted: Mutex<Vec<(String, Option<Propagation>, Grace)>>,
}

impl FakeAccessor {
    pub fn serving(objects: Vec<Object>) -> Self {
        Self {
            mode: Mutex::new(Mode::Serve(objects)),
            gate: None,
            destructive: false,
            failures_left: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
            inits: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            include_object: AtomicBool::new(false),
            namespaces: Mutex::new(Vec::new()),
            labels: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        let accessor = Self::serving(Vec::new());
        accessor.set_mode(Mode::Fail);
        accessor
    }

    pub fn with_gate(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }

    pub fn set_mode(&self, mode: Mode) {
        *self.mode.lock().unwrap() = mode;
    }

    /// Fails the next `n` fetches, then serves again.
    pub fn fail_times(&self, n: usize) {
        self.failures_left.store(n, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn current(&self) -> Result<Vec<Object>, FetchError> {
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(FetchError::transport("connection reset"));
        }
        match &*self.mode.lock().unwrap() {
            Mode::Serve(objects) => Ok(objects.clone()),
            Mode::Fail => Err(FetchError::transport("connection refused")),
        }
    }
}

#[async_trait]
impl Accessor for FakeAccessor {
    fn init(&self, factory: Arc<dyn Factory>, kind: &ResourceKind) {
        assert_eq!(factory.context_name(), "fake");
        assert_eq!(kind, &pods());
        self.inits.fetch_add(1, Ordering::SeqCst);
    }

    fn set_include_object(&self, include: bool) {
        self.include_object.store(include, Ordering::SeqCst);
    }

    async fn list(&self, ctx: &Context, ns: &str) -> Result<Vec<Object>, FetchError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.namespaces.lock().unwrap().push(ns.to_string());
        self.labels
            .lock()
            .unwrap()
            .push(ctx.labels().map(ToString::to_string));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.current()
    }

    async fn get(&self, _ctx: &Context, path: &str) -> Result<Object, FetchError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let objects = self.current()?;
        objects
            .into_iter()
            .find(|o| {
                let id = format!(
                    "{}/{}",
                    o["namespace"].as_str().unwrap_or_default(),
                    o["name"].as_str().unwrap_or_default()
                );
                id == path
            })
            .ok_or_else(|| FetchError::not_found(&pods(), path))
    }

    fn nuker(&self) -> Option<&dyn Nuker> {
        if self.destructive {
            Some(self as &dyn Nuker)
        } else {
            None
        }
    }

    fn describer(&self) -> Option<&dyn Describer> {
        if self.destructive {
            Some(self as &dyn Describer)
        } else {
            None
        }
    }
}

#[async_trait]
impl Nuker for FakeAccessor {
    async fn delete(
        &self,
        _ctx: &Context,
        path: &str,
        propagation: Option<Propagation>,
        grace: Grace,
    ) -> Result<(), Error> {
        self.deleted
            .lock()
            .unwrap()
            .push((path.to_string(), propagation, grace));
        Ok(())
    }
}

#[async_trait]
impl Describer for FakeAccessor {
    async fn describe(&self, _ctx: &Context, path: &str) -> Result<String, Error> {
        Ok(format!("Name: {path}"))
    }

    async fn to_yaml(&self, _ctx: &Context, path: &str) -> Result<String, Error> {
        Ok(format!("metadata:\n  name: {path}\n"))
    }
}

/// Renders pods, adding a NAMESPACE column when listing cluster wide.
#[derive(Default)]
pub struct PodRenderer {
    pub view_setting: Mutex<Option<ViewSetting>>,
}

impl Renderer for PodRenderer {
    fn header(&self, ns: &str) -> Header {
        let mut columns = Vec::new();
        if is_cluster_wide(ns) {
            columns.push(HeaderColumn::new("NAMESPACE"));
        }
        columns.push(HeaderColumn::new("NAME"));
        columns.push(HeaderColumn::new("STATUS"));
        columns.push(HeaderColumn::new("AGE").time(true).decorator(age_decorator));
        Header::new(columns)
    }

    fn render(&self, object: &Object, ns: &str) -> Result<Row, Error> {
        let field = |key: &str| object[key].as_str().unwrap_or_default().to_string();
        let id = format!("{}/{}", field("namespace"), field("name"));
        let mut fields = Vec::new();
        if is_cluster_wide(ns) {
            fields.push(field("namespace"));
        }
        fields.push(field("name"));
        fields.push(field("status"));
        fields.push(field("age"));
        Ok(Row { id, fields })
    }

    fn set_view_setting(&self, vs: Option<ViewSetting>) {
        *self.view_setting.lock().unwrap() = vs;
    }
}

pub fn registry(accessor: Arc<FakeAccessor>, renderer: Arc<PodRenderer>) -> Registry {
    let registry = Registry::new();
    registry.register(
        pods(),
        ResourceMeta {
            accessor: accessor as Arc<dyn Accessor>,
            renderer: renderer as Arc<dyn Renderer>,
        },
    );
    registry
}

#[derive(Debug)]
pub enum Event {
    Changed(TableData),
    NoData(TableData),
    Failed(String),
}

#[derive(Default)]
pub struct RecordingListener {
    pub events: Mutex<Vec<Event>>,
}

impl RecordingListener {
    pub fn changed(&self) -> Vec<TableData> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::Changed(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn no_data(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, Event::NoData(_)))
            .count()
    }

    pub fn failures(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::Failed(err) => Some(err.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl TableListener for RecordingListener {
    fn table_no_data(&self, data: &TableData) {
        self.events.lock().unwrap().push(Event::NoData(data.clone()));
    }

    fn table_data_changed(&self, data: &TableData) {
        self.events.lock().unwrap().push(Event::Changed(data.clone()));
    }

    fn table_load_failed(&self, err: &Error) {
        assert!(err.is_exhausted(), "unexpected failure {err}");
        self.events.lock().unwrap().push(Event::Failed(err.to_string()));
    }
}
