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

use crate::Result;
use crate::batch::{BatchRequest, BatchResponse};
use crate::model::{BlobId, BlobInfo, BucketInfo, CopyRequest};
use crate::options::{GetOption, SourceOption, TargetOption};

/// Defines the trait used to implement [crate::client::Storage].
///
/// Application developers may need to implement this trait to mock
/// `client::Storage`, or to route requests through a custom transport. In
/// other use-cases, application developers only use `client::Storage` and
/// need not be concerned with this trait or its implementations.
///
/// The methods mirror the service's RPCs one to one. Single-item reads
/// encode "not found" structurally, as `Ok(None)`; single-item deletes as
/// `Ok(false)`. All other service failures, including precondition
/// mismatches, surface as [service errors][gax::error::Error::service].
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Storage: std::fmt::Debug + Send + Sync {
    /// Fetches a blob's metadata, or `None` if the blob does not exist.
    async fn get_blob(&self, id: BlobId, options: Vec<GetOption>) -> Result<Option<BlobInfo>>;

    /// Replaces a blob's metadata, returning the new snapshot.
    async fn update_blob(&self, info: BlobInfo, options: Vec<TargetOption>) -> Result<BlobInfo>;

    /// Deletes a blob. Returns `false` if the blob did not exist.
    async fn delete_blob(&self, id: BlobId, options: Vec<SourceOption>) -> Result<bool>;

    /// Fetches a bucket's metadata, or `None` if the bucket does not exist.
    async fn get_bucket(&self, name: String, options: Vec<GetOption>) -> Result<Option<BucketInfo>>;

    /// Replaces a bucket's metadata, returning the new snapshot.
    async fn update_bucket(
        &self,
        info: BucketInfo,
        options: Vec<TargetOption>,
    ) -> Result<BucketInfo>;

    /// Deletes a bucket. Returns `false` if the bucket did not exist.
    async fn delete_bucket(&self, name: String, options: Vec<SourceOption>) -> Result<bool>;

    /// Copies a blob, returning the metadata of the new blob.
    async fn copy_blob(&self, request: CopyRequest) -> Result<BlobInfo>;

    /// Submits the accumulated operations as one logical call.
    ///
    /// Implementations must return one outcome per accumulated operation,
    /// mirroring the request's per-kind insertion order, and must represent
    /// per-item failures as failed [BatchResult][crate::batch::BatchResult]s
    /// rather than failing the whole call. Only transport-level problems
    /// (connection, authentication) fail the submission itself.
    async fn submit_batch(&self, request: BatchRequest) -> Result<BatchResponse>;
}
