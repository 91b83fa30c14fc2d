// Copyright 2025 Stratus Cloud Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Contains the Storage client and related types.

use crate::batch::{BatchRequest, BatchResponse, BatchResult};
use crate::model::{BlobId, BlobInfo, BucketInfo, CopyRequest};
use crate::options::{GetOption, SourceOption, TargetOption};
use crate::{Blob, Bucket, Result, stub};
use std::collections::HashMap;
use std::sync::Arc;

/// Implements a client for the Stratus Object Store.
///
/// # Example
/// ```no_run
/// # tokio_test::block_on(async {
/// # use stratus_storage::client::Storage;
/// let client = Storage::builder().build().await?;
/// // use `client` to make requests to the object store.
/// # stratus_storage::Result::<()>::Ok(()) });
/// ```
///
/// # Configuration
///
/// To configure `Storage` use the `with_*` methods in the type returned by
/// [builder()][Storage::builder]. The default configuration should work for
/// most applications. Common configuration changes include
///
/// * [with_endpoint()]: by default this client uses the global default
///   endpoint. Applications running in restricted networks may want to
///   override this default.
/// * [with_credentials()]: by default this client makes anonymous requests.
///   Applications accessing non-public buckets need to provide credentials.
///
/// # Pooling and Cloning
///
/// `Storage` holds a connection pool internally, it is advised to create one
/// and then reuse it. You do not need to wrap `Storage` in an
/// [Rc](std::rc::Rc) or [Arc](std::sync::Arc) to reuse it, because it
/// already uses an `Arc` internally.
///
/// This layer performs no retries and introduces no concurrency of its own:
/// every method awaits the underlying request. Batched conveniences submit
/// one [BatchRequest]; how the transport executes its items is an
/// implementation detail of the transport.
///
/// [with_endpoint()]: ClientBuilder::with_endpoint
/// [with_credentials()]: ClientBuilder::with_credentials
#[derive(Clone, Debug)]
pub struct Storage {
    inner: Arc<dyn stub::Storage>,
}

impl Storage {
    /// Returns a builder for [Storage].
    ///
    /// ```no_run
    /// # tokio_test::block_on(async {
    /// # use stratus_storage::client::Storage;
    /// let client = Storage::builder().build().await?;
    /// # stratus_storage::Result::<()>::Ok(()) });
    /// ```
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client from a custom implementation of the service trait.
    ///
    /// Mostly useful for tests and for routing requests through a custom
    /// transport.
    pub fn from_stub<T: stub::Storage + 'static>(stub: T) -> Self {
        Self {
            inner: Arc::new(stub),
        }
    }

    /// Fetches a blob and returns a [Blob] handle for it, or `None` if the
    /// blob does not exist.
    ///
    /// This is a direct single-item call, not a batch of one.
    pub async fn get_blob<I: Into<BlobId>>(
        &self,
        id: I,
        options: Vec<GetOption>,
    ) -> Result<Option<Blob>> {
        let info = self.inner.get_blob(id.into(), options).await?;
        Ok(info.map(|info| Blob::new(self.clone(), info)))
    }

    /// Replaces a blob's metadata, returning a handle with the new snapshot.
    pub async fn update_blob(
        &self,
        info: BlobInfo,
        options: Vec<TargetOption>,
    ) -> Result<Blob> {
        let info = self.inner.update_blob(info, options).await?;
        Ok(Blob::new(self.clone(), info))
    }

    /// Deletes a blob. Returns `false` if the blob did not exist.
    pub async fn delete_blob<I: Into<BlobId>>(
        &self,
        id: I,
        options: Vec<SourceOption>,
    ) -> Result<bool> {
        self.inner.delete_blob(id.into(), options).await
    }

    /// Copies a blob, returning a handle for the new blob.
    pub async fn copy_blob(&self, request: CopyRequest) -> Result<Blob> {
        let info = self.inner.copy_blob(request).await?;
        Ok(Blob::new(self.clone(), info))
    }

    /// Fetches a bucket and returns a [Bucket] handle for it, or `None` if
    /// the bucket does not exist.
    pub async fn get_bucket<N: Into<String>>(
        &self,
        name: N,
        options: Vec<GetOption>,
    ) -> Result<Option<Bucket>> {
        let info = self.inner.get_bucket(name.into(), options).await?;
        Ok(info.map(|info| Bucket::new(self.clone(), info)))
    }

    /// Replaces a bucket's metadata, returning a handle with the new
    /// snapshot.
    pub async fn update_bucket(
        &self,
        info: BucketInfo,
        options: Vec<TargetOption>,
    ) -> Result<Bucket> {
        let info = self.inner.update_bucket(info, options).await?;
        Ok(Bucket::new(self.clone(), info))
    }

    /// Deletes a bucket. Returns `false` if the bucket did not exist.
    pub async fn delete_bucket<N: Into<String>>(
        &self,
        name: N,
        options: Vec<SourceOption>,
    ) -> Result<bool> {
        self.inner.delete_bucket(name.into(), options).await
    }

    /// Gets the requested blobs using a single batch request.
    ///
    /// The returned list preserves positional correspondence with `ids`:
    /// element *i* is the handle for `ids[i]`, or `None` if that blob does
    /// not exist or its item failed (e.g. access was denied).
    ///
    /// # Example
    /// ```no_run
    /// # use stratus_storage::client::Storage;
    /// # use stratus_storage::model::BlobId;
    /// # async fn example(client: &Storage) -> stratus_storage::Result<()> {
    /// let blobs = client
    ///     .get_blobs([BlobId::new("b", "n1"), BlobId::new("b", "n2")])
    ///     .await?;
    /// assert_eq!(blobs.len(), 2);
    /// # Ok(()) }
    /// ```
    pub async fn get_blobs<I, B>(&self, ids: I) -> Result<Vec<Option<Blob>>>
    where
        I: IntoIterator<Item = B>,
        B: Into<BlobId>,
    {
        let ids: Vec<BlobId> = ids.into_iter().map(|id| id.into()).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let request = ids
            .iter()
            .fold(BatchRequest::new(), |r, id| r.get(id.clone(), vec![]));
        let response = self.inner.submit_batch(request.clone()).await?;
        // The response mirrors the (deduplicated) request entries; index the
        // outcomes by id so duplicate input ids resolve to the same outcome.
        let by_id: HashMap<&BlobId, &BatchResult<Option<BlobInfo>>> = request
            .gets()
            .iter()
            .map(|(id, _)| id)
            .zip(response.gets())
            .collect();
        Ok(ids
            .iter()
            .map(|id| {
                by_id
                    .get(id)
                    .and_then(|r| r.get().ok())
                    .and_then(|info| info.clone())
                    .map(|info| Blob::new(self.clone(), info))
            })
            .collect())
    }

    /// Updates the requested blobs using a single batch request.
    ///
    /// The returned list preserves positional correspondence with `infos`:
    /// element *i* is a handle with the new snapshot, or `None` if that
    /// item failed (e.g. the blob does not exist or a precondition did not
    /// hold).
    pub async fn update_blobs<I>(&self, infos: I) -> Result<Vec<Option<Blob>>>
    where
        I: IntoIterator<Item = BlobInfo>,
    {
        let infos: Vec<BlobInfo> = infos.into_iter().collect();
        if infos.is_empty() {
            return Ok(Vec::new());
        }
        let request = infos
            .iter()
            .fold(BatchRequest::new(), |r, info| r.update(info.clone(), vec![]));
        let response = self.inner.submit_batch(request.clone()).await?;
        let by_id: HashMap<BlobId, &BatchResult<BlobInfo>> = request
            .updates()
            .iter()
            .map(|(info, _)| info.id())
            .zip(response.updates())
            .collect();
        Ok(infos
            .iter()
            .map(|info| {
                by_id
                    .get(&info.id())
                    .and_then(|r| r.get().ok())
                    .map(|info| Blob::new(self.clone(), info.clone()))
            })
            .collect())
    }

    /// Deletes the requested blobs using a single batch request.
    ///
    /// The returned list preserves positional correspondence with `ids`:
    /// element *i* is `true` if `ids[i]` was deleted, and `false` if the
    /// blob was not found or its item failed.
    pub async fn delete_blobs<I, B>(&self, ids: I) -> Result<Vec<bool>>
    where
        I: IntoIterator<Item = B>,
        B: Into<BlobId>,
    {
        let ids: Vec<BlobId> = ids.into_iter().map(|id| id.into()).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let request = ids
            .iter()
            .fold(BatchRequest::new(), |r, id| r.delete(id.clone(), vec![]));
        let response = self.inner.submit_batch(request.clone()).await?;
        let by_id: HashMap<&BlobId, &BatchResult<bool>> = request
            .deletes()
            .iter()
            .map(|(id, _)| id)
            .zip(response.deletes())
            .collect();
        Ok(ids
            .iter()
            .map(|id| {
                by_id
                    .get(id)
                    .and_then(|r| r.get().ok())
                    .copied()
                    .unwrap_or(false)
            })
            .collect())
    }

    /// Submits a [BatchRequest], returning the per-item outcomes.
    ///
    /// Use this form to combine heterogeneous operations, or to inspect the
    /// per-item [Status][gax::error::rpc::Status] of failures; the
    /// convenience methods ([get_blobs][Storage::get_blobs] and friends)
    /// collapse failures to `None`/`false`.
    pub async fn submit_batch(&self, request: BatchRequest) -> Result<BatchResponse> {
        self.inner.submit_batch(request).await
    }
}

/// The credentials used to authenticate requests.
///
/// The transport attaches these to every request. None of the variants are
/// ever logged.
#[derive(Clone)]
#[non_exhaustive]
pub enum Credentials {
    /// Make unauthenticated requests. Only public resources are accessible.
    Anonymous,
    /// Attach a bearer token to every request.
    Bearer(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The token is deliberately omitted.
        match self {
            Self::Anonymous => f.write_str("Credentials::Anonymous"),
            Self::Bearer(_) => f.write_str("Credentials::Bearer(..)"),
        }
    }
}

/// A builder for [Storage].
///
/// ```no_run
/// # tokio_test::block_on(async {
/// # use stratus_storage::client::{ClientBuilder, Credentials, Storage};
/// let builder: ClientBuilder = Storage::builder();
/// let client = builder
///     .with_endpoint("https://storage.stratus-cloud.dev")
///     .with_credentials(Credentials::Bearer("my-token".into()))
///     .build()
///     .await?;
/// # stratus_storage::Result::<()>::Ok(()) });
/// ```
#[derive(Clone, Debug)]
pub struct ClientBuilder {
    endpoint: Option<String>,
    credentials: Credentials,
}

impl ClientBuilder {
    pub(crate) fn new() -> Self {
        Self {
            endpoint: None,
            credentials: Credentials::Anonymous,
        }
    }

    /// Sets the endpoint. Defaults to the service's global endpoint.
    pub fn with_endpoint<T: Into<String>>(mut self, v: T) -> Self {
        self.endpoint = Some(v.into());
        self
    }

    /// Sets the credentials. Defaults to [Credentials::Anonymous].
    pub fn with_credentials(mut self, v: Credentials) -> Self {
        self.credentials = v;
        self
    }

    /// Creates the client with the configured transport.
    pub async fn build(self) -> Result<Storage> {
        let transport = crate::transport::HttpStorage::new(self.endpoint, self.credentials)?;
        Ok(Storage::from_stub(transport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::MockStorage;
    use anyhow::Result;
    use gax::error::rpc::{Code, Status};

    fn id(name: &str) -> BlobId {
        BlobId::new("bucket", name)
    }

    fn info(name: &str) -> BlobInfo {
        BlobInfo::new().set_bucket("bucket").set_name(name).set_generation(1)
    }

    fn not_found() -> Status {
        Status::default().set_code(Code::NotFound).set_message("not found")
    }

    #[tokio::test]
    async fn get_blob_found() -> Result<()> {
        let mut mock = MockStorage::new();
        mock.expect_get_blob()
            .withf(|id, options| id == &BlobId::new("bucket", "n1") && options.is_empty())
            .return_once(|_, _| Ok(Some(info("n1"))));
        let client = Storage::from_stub(mock);

        let blob = client.get_blob(id("n1"), vec![]).await?;
        assert_eq!(blob.map(|b| b.info().clone()), Some(info("n1")));
        Ok(())
    }

    #[tokio::test]
    async fn get_blob_not_found_is_none() -> Result<()> {
        let mut mock = MockStorage::new();
        mock.expect_get_blob().return_once(|_, _| Ok(None));
        let client = Storage::from_stub(mock);

        let blob = client.get_blob(id("missing"), vec![]).await?;
        assert!(blob.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn get_blobs_preserves_input_order() -> Result<()> {
        let mut mock = MockStorage::new();
        mock.expect_submit_batch().return_once(|request| {
            // Simulate a server that processes items in its own order: the
            // response must still mirror the request's insertion order.
            let names: Vec<_> = request.gets().iter().map(|(id, _)| id.name.clone()).collect();
            assert_eq!(names, vec!["n1", "n2", "n3"]);
            Ok(BatchResponse::new(
                vec![
                    BatchResult::success(Some(info("n1"))),
                    BatchResult::success(Some(info("n2"))),
                    BatchResult::success(Some(info("n3"))),
                ],
                vec![],
                vec![],
            ))
        });
        let client = Storage::from_stub(mock);

        let blobs = client.get_blobs([id("n1"), id("n2"), id("n3")]).await?;
        let names: Vec<_> = blobs
            .iter()
            .map(|b| b.as_ref().map(|b| b.info().name.clone()))
            .collect();
        assert_eq!(
            names,
            vec![
                Some("n1".to_string()),
                Some("n2".to_string()),
                Some("n3".to_string())
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn get_blobs_mixed_missing_yields_positional_none() -> Result<()> {
        let mut mock = MockStorage::new();
        mock.expect_submit_batch().return_once(|_| {
            Ok(BatchResponse::new(
                vec![
                    BatchResult::success(Some(info("a"))),
                    BatchResult::success(None),
                    BatchResult::success(Some(info("c"))),
                ],
                vec![],
                vec![],
            ))
        });
        let client = Storage::from_stub(mock);

        let blobs = client.get_blobs([id("a"), id("b"), id("c")]).await?;
        assert_eq!(blobs.len(), 3);
        assert!(blobs[0].is_some());
        assert!(blobs[1].is_none());
        assert!(blobs[2].is_some());
        Ok(())
    }

    #[tokio::test]
    async fn get_blobs_failed_item_yields_none() -> Result<()> {
        let mut mock = MockStorage::new();
        mock.expect_submit_batch().return_once(|_| {
            Ok(BatchResponse::new(
                vec![
                    BatchResult::failure(
                        Status::default().set_code(Code::PermissionDenied),
                    ),
                    BatchResult::success(Some(info("n2"))),
                ],
                vec![],
                vec![],
            ))
        });
        let client = Storage::from_stub(mock);

        let blobs = client.get_blobs([id("n1"), id("n2")]).await?;
        assert!(blobs[0].is_none());
        assert!(blobs[1].is_some());
        Ok(())
    }

    #[tokio::test]
    async fn get_blobs_duplicate_ids_share_one_item() -> Result<()> {
        let mut mock = MockStorage::new();
        mock.expect_submit_batch().return_once(|request| {
            // The request deduplicates; the facade re-expands.
            assert_eq!(request.gets().len(), 2);
            Ok(BatchResponse::new(
                vec![
                    BatchResult::success(Some(info("n1"))),
                    BatchResult::success(None),
                ],
                vec![],
                vec![],
            ))
        });
        let client = Storage::from_stub(mock);

        let blobs = client.get_blobs([id("n1"), id("n2"), id("n1")]).await?;
        assert_eq!(blobs.len(), 3);
        assert!(blobs[0].is_some());
        assert!(blobs[1].is_none());
        assert!(blobs[2].is_some());
        Ok(())
    }

    #[tokio::test]
    async fn get_blobs_empty_input_skips_submission() -> Result<()> {
        let mock = MockStorage::new();
        let client = Storage::from_stub(mock);
        let blobs = client.get_blobs(Vec::<BlobId>::new()).await?;
        assert!(blobs.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn get_blobs_transport_failure_propagates() {
        let mut mock = MockStorage::new();
        mock.expect_submit_batch()
            .return_once(|_| Err(crate::Error::io("simulated connection reset")));
        let client = Storage::from_stub(mock);

        let got = client.get_blobs([id("n1")]).await;
        assert!(matches!(&got, Err(e) if e.is_io()), "{got:?}");
    }

    #[tokio::test]
    async fn update_blobs_failed_item_yields_none() -> Result<()> {
        let mut mock = MockStorage::new();
        mock.expect_submit_batch().return_once(|request| {
            assert_eq!(request.updates().len(), 2);
            Ok(BatchResponse::new(
                vec![],
                vec![
                    BatchResult::success(info("n1").set_metageneration(2)),
                    BatchResult::failure(not_found()),
                ],
                vec![],
            ))
        });
        let client = Storage::from_stub(mock);

        let blobs = client.update_blobs([info("n1"), info("n2")]).await?;
        assert_eq!(blobs[0].as_ref().map(|b| b.info().metageneration), Some(2));
        assert!(blobs[1].is_none());
        Ok(())
    }

    #[tokio::test]
    async fn delete_blobs_mixed_outcomes() -> Result<()> {
        let mut mock = MockStorage::new();
        mock.expect_submit_batch().return_once(|_| {
            Ok(BatchResponse::new(
                vec![],
                vec![],
                vec![
                    BatchResult::success(true),
                    BatchResult::failure(
                        Status::default().set_code(Code::PermissionDenied),
                    ),
                ],
            ))
        });
        let client = Storage::from_stub(mock);

        let got = client.delete_blobs([id("x"), id("y")]).await?;
        assert_eq!(got, vec![true, false]);
        Ok(())
    }

    #[tokio::test]
    async fn resubmitting_a_request_yields_independent_responses() -> Result<()> {
        let mut mock = MockStorage::new();
        mock.expect_submit_batch().times(2).returning(|_| {
            Ok(BatchResponse::new(
                vec![BatchResult::success(Some(info("n1")))],
                vec![],
                vec![],
            ))
        });
        let client = Storage::from_stub(mock);

        let request = BatchRequest::new().get(id("n1"), vec![]);
        let first = client.submit_batch(request.clone()).await?;
        let second = client.submit_batch(request).await?;
        // Equal contents, but separate values with no shared mutable state.
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn credentials_debug_redacts_token() {
        let got = format!("{:?}", Credentials::Bearer("super-secret".into()));
        assert!(!got.contains("super-secret"), "{got}");
    }
}
