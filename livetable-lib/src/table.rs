//! Table model: polls a resource kind and notifies listeners.

use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use log::{debug, error, warn};
use tokio::task::JoinHandle;

use crate::context::Context;
use crate::error::Error;
use crate::labels::LabelSelector;
use crate::listener::TableListener;
use crate::model::TableData;
use crate::model::render_rows;
use crate::namespace;
use crate::refresh::ExponentialBackoff;
use crate::refresh::RefreshConfig;
use crate::resource::Grace;
use crate::resource::Object;
use crate::resource::Propagation;
use crate::resource::Registry;
use crate::resource::ResourceKind;
use crate::resource::ResourceMeta;
use crate::resource::ViewSetting;

/// A live table of one resource kind.
///
/// The model owns a [`TableData`], reconciles it against the resource store
/// on demand ([`TableModel::refresh`]) or periodically ([`TableModel::watch`])
/// and pushes snapshots to its listeners. At most one reconciliation runs at a
/// time; overlapping attempts are dropped.
///
/// This handle is cheap to clone (uses `Arc` internally); clones drive the
/// same model.
///
/// # Example
///
/// ```ignore
/// use livetable_lib::{Context, TableModel};
/// use livetable_lib::resource::{Registry, ResourceKind};
///
/// let model = TableModel::new(ResourceKind::new("v1/pods"), registry);
/// model.set_namespace("default");
/// model.add_listener(view.clone());
///
/// let ctx = Context::new().with_factory(factory);
/// model.watch(&ctx).await?;
/// // ...
/// ctx.cancel();
/// ```
#[derive(Clone)]
pub struct TableModel {
    inner: Arc<TableInner>,
}

struct TableInner {
    gvr: ResourceKind,
    registry: Registry,
    config: RefreshConfig,
    data: RwLock<TableData>,
    listeners: RwLock<Vec<Arc<dyn TableListener>>>,
    in_update: AtomicBool,
    settings: RwLock<Settings>,
}

#[derive(Debug, Clone)]
struct Settings {
    refresh_rate: Duration,
    instance: String,
    labels: Option<LabelSelector>,
    view_setting: Option<ViewSetting>,
}

impl TableModel {
    /// Creates a model with the default refresh configuration.
    pub fn new(gvr: ResourceKind, registry: Registry) -> Self {
        Self::with_config(gvr, registry, RefreshConfig::default())
    }

    /// Creates a model with a custom refresh configuration.
    pub fn with_config(gvr: ResourceKind, registry: Registry, config: RefreshConfig) -> Self {
        let settings = Settings {
            refresh_rate: config.refresh_rate,
            instance: String::new(),
            labels: None,
            view_setting: None,
        };
        Self {
            inner: Arc::new(TableInner {
                data: RwLock::new(TableData::new(gvr.clone())),
                gvr,
                registry,
                config,
                listeners: RwLock::new(Vec::new()),
                in_update: AtomicBool::new(false),
                settings: RwLock::new(settings),
            }),
        }
    }

    /// Returns the resource kind.
    pub fn gvr(&self) -> &ResourceKind {
        &self.inner.gvr
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Installs the view setting forwarded to the renderer.
    ///
    /// With a context, the table is refreshed right away; a failure is logged
    /// and left for the scheduler to retry.
    pub async fn set_view_setting(&self, ctx: Option<&Context>, vs: Option<ViewSetting>) {
        write(&self.inner.settings).view_setting = vs;

        if let Some(ctx) = ctx {
            if let Err(err) = self.refresh(ctx).await {
                error!("Refresh of {} failed: {err}", self.inner.gvr);
            }
        }
    }

    /// Returns the current view setting.
    pub fn view_setting(&self) -> Option<ViewSetting> {
        read(&self.inner.settings).view_setting.clone()
    }

    /// Sets the label selector attached to list calls.
    pub fn set_label_selector(&self, sel: Option<LabelSelector>) {
        write(&self.inner.settings).labels = sel;
    }

    /// Returns the label selector.
    pub fn label_selector(&self) -> Option<LabelSelector> {
        read(&self.inner.settings).labels.clone()
    }

    /// Pins the table to a single resource path. An empty path lists the
    /// whole namespace again.
    pub fn set_instance(&self, path: impl Into<String>) {
        write(&self.inner.settings).instance = path.into();
    }

    /// Returns the pinned resource path, empty when listing.
    pub fn instance(&self) -> String {
        read(&self.inner.settings).instance.clone()
    }

    /// Sets the delay between scheduler ticks. Takes effect on the next tick.
    pub fn set_refresh_rate(&self, rate: Duration) {
        write(&self.inner.settings).refresh_rate = rate;
    }

    /// Returns the delay between scheduler ticks.
    pub fn refresh_rate(&self) -> Duration {
        read(&self.inner.settings).refresh_rate
    }

    /// Switches the namespace scope, dropping every row.
    pub fn set_namespace(&self, ns: impl Into<String>) {
        write(&self.inner.data).reset(ns);
    }

    /// Returns the namespace scope.
    pub fn namespace(&self) -> String {
        read(&self.inner.data).namespace().to_string()
    }

    /// Returns `true` if the table is scoped to `ns` and holds rows.
    pub fn in_namespace(&self, ns: &str) -> bool {
        let data = read(&self.inner.data);
        data.namespace() == ns && !data.is_empty()
    }

    /// Returns `true` if the namespace scope spans the whole cluster.
    pub fn cluster_wide(&self) -> bool {
        namespace::is_cluster_wide(read(&self.inner.data).namespace())
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Registers a listener.
    pub fn add_listener(&self, listener: Arc<dyn TableListener>) {
        write(&self.inner.listeners).push(listener);
    }

    /// Unregisters a listener. Unknown listeners are ignored.
    pub fn remove_listener(&self, listener: &Arc<dyn TableListener>) {
        let mut listeners = write(&self.inner.listeners);
        if let Some(victim) = listeners.iter().position(|l| Arc::ptr_eq(l, listener)) {
            listeners.remove(victim);
        }
    }

    /// Returns the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        read(&self.inner.listeners).len()
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    /// Returns a snapshot of the current rows.
    pub fn peek(&self) -> TableData {
        read(&self.inner.data).clone()
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        read(&self.inner.data).row_count()
    }

    /// Returns `true` if the table holds no rows.
    pub fn is_empty(&self) -> bool {
        read(&self.inner.data).is_empty()
    }

    /// Reconciles once, then keeps reconciling in the background until `ctx`
    /// is cancelled.
    ///
    /// Returns the first reconciliation's error without starting the
    /// scheduler. Once started, the scheduler retries failing ticks with
    /// exponential backoff; when the retry window is spent it notifies
    /// listeners with [`TableListener::table_load_failed`] and stops for good.
    pub async fn watch(&self, ctx: &Context) -> Result<JoinHandle<()>, Error> {
        self.refresh(ctx).await?;

        let model = self.clone();
        let ctx = ctx.clone();
        Ok(tokio::spawn(async move { model.updater(ctx).await }))
    }

    /// Reconciles once and notifies listeners.
    ///
    /// Returns immediately with `Ok(())` if another reconciliation of this
    /// model is already in flight.
    pub async fn refresh(&self, ctx: &Context) -> Result<(), Error> {
        let Some(_guard) = UpdateGuard::acquire(&self.inner.in_update) else {
            debug!("Dropping update for {}...", self.inner.gvr);
            return Ok(());
        };

        if !self.reconcile(ctx).await? {
            return Ok(());
        }
        let data = self.peek();
        if data.is_empty() {
            self.fire_no_data(&data);
        } else {
            self.fire_table_changed(&data);
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Resource operations
    // -------------------------------------------------------------------------

    /// Fetches a single resource.
    pub async fn get(&self, ctx: &Context, path: &str) -> Result<Object, Error> {
        let meta = self.resolve(ctx)?;
        Ok(meta.accessor.get(ctx, path).await?)
    }

    /// Deletes a resource.
    ///
    /// Fails with [`Error::Unsupported`] if the accessor cannot delete.
    pub async fn delete(
        &self,
        ctx: &Context,
        path: &str,
        propagation: Option<Propagation>,
        grace: Grace,
    ) -> Result<(), Error> {
        let meta = self.resolve(ctx)?;
        let nuker = meta
            .accessor
            .nuker()
            .ok_or_else(|| Error::unsupported("delete", &self.inner.gvr))?;

        nuker.delete(ctx, path, propagation, grace).await
    }

    /// Describes a resource.
    pub async fn describe(&self, ctx: &Context, path: &str) -> Result<String, Error> {
        let meta = self.resolve(ctx)?;
        let describer = meta
            .accessor
            .describer()
            .ok_or_else(|| Error::unsupported("describe", &self.inner.gvr))?;

        describer.describe(ctx, path).await
    }

    /// Returns a resource's YAML manifest.
    pub async fn to_yaml(&self, ctx: &Context, path: &str) -> Result<String, Error> {
        let meta = self.resolve(ctx)?;
        let describer = meta
            .accessor
            .describer()
            .ok_or_else(|| Error::unsupported("yaml", &self.inner.gvr))?;

        describer.to_yaml(ctx, path).await
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    async fn updater(self, ctx: Context) {
        let gvr = self.inner.gvr.clone();
        let mut rate = self.inner.config.initial_interval;
        loop {
            tokio::select! {
                _ = ctx.cancelled() => {
                    debug!("Updater for {gvr} cancelled");
                    return;
                }
                _ = tokio::time::sleep(rate) => {}
            }
            rate = self.refresh_rate();

            match self.refresh_with_backoff(&ctx).await {
                Ok(()) => {}
                Err(Error::Cancelled) => {
                    debug!("Updater for {gvr} cancelled while retrying");
                    return;
                }
                Err(err) => {
                    warn!("Reconciler for {gvr} exited: {err}");
                    self.fire_table_load_failed(&err);
                    return;
                }
            }
        }
    }

    async fn refresh_with_backoff(&self, ctx: &Context) -> Result<(), Error> {
        let mut backoff = ExponentialBackoff::new(&self.inner.config);
        let mut attempts = 0;
        loop {
            attempts += 1;
            let err = match self.refresh(ctx).await {
                Ok(()) => return Ok(()),
                Err(err) => err,
            };
            if ctx.is_cancelled() {
                return Err(Error::Cancelled);
            }
            error!("Refresh of {} failed (attempt {attempts}): {err}", self.inner.gvr);

            let Some(delay) = backoff.next_delay() else {
                return Err(Error::RetryExhausted {
                    attempts,
                    elapsed: backoff.elapsed(),
                    source: Box::new(err),
                });
            };
            tokio::select! {
                _ = ctx.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Fetches and renders the current rows. Returns `false` when the result
    /// was discarded because the namespace changed while fetching.
    async fn reconcile(&self, ctx: &Context) -> Result<bool, Error> {
        let meta = self.resolve(ctx)?;
        let settings = read(&self.inner.settings).clone();
        if settings.view_setting.is_some() {
            meta.accessor.set_include_object(true);
        }
        let ctx = ctx.clone().with_labels(settings.labels);
        let ns = self.namespace();

        let objects = if settings.instance.is_empty() {
            let mut list_ns = namespace::cleanse_namespace(&ns);
            if namespace::is_cluster_scoped(list_ns) {
                list_ns = namespace::BLANK_NAMESPACE;
            }
            meta.accessor.list(&ctx, list_ns).await?
        } else {
            vec![meta.accessor.get(&ctx, &settings.instance).await?]
        };

        meta.renderer.set_view_setting(settings.view_setting);
        let (header, rows) = render_rows(meta.renderer.as_ref(), &ns, &objects)?;

        let mut data = write(&self.inner.data);
        if data.namespace() != ns {
            debug!(
                "Discarding {} render for {ns:?}, namespace is now {:?}",
                self.inner.gvr,
                data.namespace()
            );
            return Ok(false);
        }
        data.update(header, rows);

        Ok(true)
    }

    /// Resolves and initializes the accessor/renderer pair.
    fn resolve(&self, ctx: &Context) -> Result<ResourceMeta, Error> {
        let factory = ctx
            .factory()
            .cloned()
            .ok_or_else(|| Error::configuration("expected a factory in context"))?;
        let meta = self.inner.registry.lookup(&self.inner.gvr)?;
        meta.accessor.init(factory, &self.inner.gvr);

        Ok(meta)
    }

    fn listeners(&self) -> Vec<Arc<dyn TableListener>> {
        read(&self.inner.listeners).clone()
    }

    fn fire_table_changed(&self, data: &TableData) {
        for l in self.listeners() {
            l.table_data_changed(data);
        }
    }

    fn fire_no_data(&self, data: &TableData) {
        for l in self.listeners() {
            l.table_no_data(data);
        }
    }

    fn fire_table_load_failed(&self, err: &Error) {
        for l in self.listeners() {
            l.table_load_failed(err);
        }
    }
}

impl std::fmt::Debug for TableModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableModel")
            .field("gvr", &self.inner.gvr)
            .field("namespace", &self.namespace())
            .field("rows", &self.row_count())
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

/// Holds the in-progress flag for the lifetime of one reconciliation.
struct UpdateGuard<'a>(&'a AtomicBool);

impl<'a> UpdateGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for UpdateGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
