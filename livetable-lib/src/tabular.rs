//! The contract a presentation layer drives a table model through.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::context::Context;
use crate::error::Error;
use crate::labels::LabelSelector;
use crate::listener::TableListener;
use crate::model::TableData;
use crate::resource::Grace;
use crate::resource::Object;
use crate::resource::Propagation;
use crate::resource::ViewSetting;
use crate::table::TableModel;

/// Everything a view needs from a table model.
///
/// [`TableModel`] is the live implementation; views can be exercised against
/// a canned one.
#[async_trait]
pub trait Tabular: Send + Sync {
    /// Installs the view setting, refreshing right away when given a context.
    async fn set_view_setting(&self, ctx: Option<&Context>, vs: Option<ViewSetting>);

    /// Pins the table to a single resource path.
    fn set_instance(&self, path: &str);

    /// Sets the label selector.
    fn set_label_selector(&self, sel: Option<LabelSelector>);

    /// Returns the label selector.
    fn label_selector(&self) -> Option<LabelSelector>;

    /// Returns `true` if the table holds no rows.
    fn is_empty(&self) -> bool;

    /// Returns the number of rows.
    fn row_count(&self) -> usize;

    /// Returns a snapshot of the current rows.
    fn peek(&self) -> TableData;

    /// Reconciles once.
    async fn refresh(&self, ctx: &Context) -> Result<(), Error>;

    /// Returns `true` if the namespace scope spans the whole cluster.
    fn cluster_wide(&self) -> bool;

    /// Returns the namespace scope.
    fn namespace(&self) -> String;

    /// Switches the namespace scope.
    fn set_namespace(&self, ns: &str);

    /// Returns `true` if the table is scoped to `ns` and holds rows.
    fn in_namespace(&self, ns: &str) -> bool;

    /// Sets the delay between scheduler ticks.
    fn set_refresh_rate(&self, rate: Duration);

    /// Registers a listener.
    fn add_listener(&self, listener: Arc<dyn TableListener>);

    /// Unregisters a listener.
    fn remove_listener(&self, listener: &Arc<dyn TableListener>);

    /// Starts background reconciliation.
    async fn watch(&self, ctx: &Context) -> Result<(), Error>;

    /// Fetches a single resource.
    async fn get(&self, ctx: &Context, path: &str) -> Result<Object, Error>;

    /// Deletes a resource.
    async fn delete(
        &self,
        ctx: &Context,
        path: &str,
        propagation: Option<Propagation>,
        grace: Grace,
    ) -> Result<(), Error>;

    /// Describes a resource.
    async fn describe(&self, ctx: &Context, path: &str) -> Result<String, Error>;

    /// Returns a resource's YAML manifest.
    async fn to_yaml(&self, ctx: &Context, path: &str) -> Result<String, Error>;
}

#[async_trait]
impl Tabular for TableModel {
    async fn set_view_setting(&self, ctx: Option<&Context>, vs: Option<ViewSetting>) {
        TableModel::set_view_setting(self, ctx, vs).await
    }

    fn set_instance(&self, path: &str) {
        TableModel::set_instance(self, path)
    }

    fn set_label_selector(&self, sel: Option<LabelSelector>) {
        TableModel::set_label_selector(self, sel)
    }

    fn label_selector(&self) -> Option<LabelSelector> {
        TableModel::label_selector(self)
    }

    fn is_empty(&self) -> bool {
        TableModel::is_empty(self)
    }

    fn row_count(&self) -> usize {
        TableModel::row_count(self)
    }

    fn peek(&self) -> TableData {
        TableModel::peek(self)
    }

    async fn refresh(&self, ctx: &Context) -> Result<(), Error> {
        TableModel::refresh(self, ctx).await
    }

    fn cluster_wide(&self) -> bool {
        TableModel::cluster_wide(self)
    }

    fn namespace(&self) -> String {
        TableModel::namespace(self)
    }

    fn set_namespace(&self, ns: &str) {
        TableModel::set_namespace(self, ns)
    }

    fn in_namespace(&self, ns: &str) -> bool {
        TableModel::in_namespace(self, ns)
    }

    fn set_refresh_rate(&self, rate: Duration) {
        TableModel::set_refresh_rate(self, rate)
    }

    fn add_listener(&self, listener: Arc<dyn TableListener>) {
        TableModel::add_listener(self, listener)
    }

    fn remove_listener(&self, listener: &Arc<dyn TableListener>) {
        TableModel::remove_listener(self, listener)
    }

    async fn watch(&self, ctx: &Context) -> Result<(), Error> {
        TableModel::watch(self, ctx).await.map(|_| ())
    }

    async fn get(&self, ctx: &Context, path: &str) -> Result<Object, Error> {
        TableModel::get(self, ctx, path).await
    }

    async fn delete(
        &self,
        ctx: &Context,
        path: &str,
        propagation: Option<Propagation>,
        grace: Grace,
    ) -> Result<(), Error> {
        TableModel::delete(self, ctx, path, propagation, grace).await
    }

    async fn describe(&self, ctx: &Context, path: &str) -> Result<String, Error> {
        TableModel::describe(self, ctx, path).await
    }

    async fn to_yaml(&self, ctx: &Context, path: &str) -> Result<String, Error> {
        TableModel::to_yaml(self, ctx, path).await
    }
}
