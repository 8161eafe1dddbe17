//! Generic data services for the backend collections

use futures::channel::oneshot;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use vtc_shared::{
    id::DbId,
    req_args::PageReqArgs,
    resource::{PageOrList, Paginated, ResourceKind},
};

use crate::{
    client::{UiCallBack, DUMMY_ARGUMENT},
    Client,
};

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn list_page<T, F>(
        &self,
        kind: ResourceKind,
        args: &PageReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Paginated<T>>>
    where
        T: Send + Debug + DeserializeOwned + 'static,
        F: UiCallBack,
    {
        let token = self.token();
        self.send_request_with(
            &kind.list_spec(),
            args,
            token.as_ref(),
            ui_notify,
            |outcome: Result<Option<PageOrList<T>>, _>| {
                // No data is an empty collection
                Ok(outcome?
                    .map(Paginated::from)
                    .unwrap_or_else(|| PageOrList::List(Vec::new()).into()))
            },
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn get_one<T, F>(
        &self,
        kind: ResourceKind,
        id: DbId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<T>>
    where
        T: Send + Debug + DeserializeOwned + 'static,
        F: UiCallBack,
    {
        self.send_request_expect_data(&kind.get_spec(id), &DUMMY_ARGUMENT, ui_notify)
    }

    /// Returns the created record if the backend sends it back
    #[tracing::instrument(skip(body, ui_notify))]
    pub fn create<B, T, F>(
        &self,
        kind: ResourceKind,
        body: &B,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Option<T>>>
    where
        B: serde::Serialize + Debug,
        T: Send + Debug + DeserializeOwned + 'static,
        F: UiCallBack,
    {
        self.send_request_expect_maybe_data(&kind.create_spec(), body, ui_notify)
    }

    #[tracing::instrument(skip(body, ui_notify))]
    pub fn update<B, T, F>(
        &self,
        kind: ResourceKind,
        id: DbId,
        body: &B,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Option<T>>>
    where
        B: serde::Serialize + Debug,
        T: Send + Debug + DeserializeOwned + 'static,
        F: UiCallBack,
    {
        self.send_request_expect_maybe_data(&kind.update_spec(id), body, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn delete<F: UiCallBack>(
        &self,
        kind: ResourceKind,
        id: DbId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        let token = self.token();
        self.send_request_expect_ok(&kind.delete_spec(id), &DUMMY_ARGUMENT, token.as_ref(), ui_notify)
    }
}
