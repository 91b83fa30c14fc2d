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

use crate::client::Storage;
use crate::error::HandleMismatch;
use crate::model::{BlobId, BlobInfo, CopyRequest};
use crate::options::{self, MatchRule};
use crate::{Error, Result};

/// A handle to a blob: a metadata snapshot paired with the client that
/// produced it.
///
/// A handle never mutates in place. Operations that change server-side state
/// ([update][Blob::update], [copy_to][Blob::copy_to]) return a *new* handle
/// carrying the post-operation snapshot, and [reload][Blob::reload] returns a
/// fresh handle. The original handle keeps the snapshot it was created with,
/// which may be stale.
///
/// [MatchRule] arguments let callers pin an operation to the snapshot's
/// generation counters, turning "lost update" races into
/// [FailedPrecondition][gax::error::rpc::Code::FailedPrecondition] failures:
///
/// ```no_run
/// # use stratus_storage::{Blob, options::MatchRule};
/// # async fn example(blob: &Blob) -> stratus_storage::Result<()> {
/// let updated = blob
///     .update(
///         blob.info().clone().set_cache_control("no-cache"),
///         &[MatchRule::MetagenerationMatch],
///     )
///     .await?;
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct Blob {
    storage: Storage,
    info: BlobInfo,
}

impl Blob {
    pub(crate) fn new(storage: Storage, info: BlobInfo) -> Self {
        Self { storage, info }
    }

    /// The metadata snapshot this handle carries.
    pub fn info(&self) -> &BlobInfo {
        &self.info
    }

    /// The id of the live version of this blob.
    pub fn id(&self) -> BlobId {
        self.info.id()
    }

    /// The client this handle is bound to.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Checks if this blob still exists.
    pub async fn exists(&self, rules: &[MatchRule]) -> Result<bool> {
        let options = options::to_get_options(&self.info, rules);
        let info = self.storage.get_blob(self.id(), options).await?;
        Ok(info.is_some())
    }

    /// Fetches a fresh snapshot of this blob, or `None` if it no longer
    /// exists.
    pub async fn reload(&self, rules: &[MatchRule]) -> Result<Option<Blob>> {
        let options = options::to_get_options(&self.info, rules);
        self.storage.get_blob(self.id(), options).await
    }

    /// Replaces this blob's metadata with `info`, returning a handle with
    /// the new snapshot.
    ///
    /// `info` must name the same bucket and blob as this handle; any
    /// [MatchRule]s are evaluated against this handle's snapshot, not
    /// against `info`.
    pub async fn update(&self, info: BlobInfo, rules: &[MatchRule]) -> Result<Blob> {
        if info.bucket != self.info.bucket {
            return Err(Error::other(HandleMismatch::Bucket {
                got: info.bucket,
                want: self.info.bucket.clone(),
            }));
        }
        if info.name != self.info.name {
            return Err(Error::other(HandleMismatch::Name {
                got: info.name,
                want: self.info.name.clone(),
            }));
        }
        let options = options::to_target_options(&self.info, rules);
        self.storage.update_blob(info, options).await
    }

    /// Deletes this blob. Returns `false` if it no longer exists.
    pub async fn delete(&self, rules: &[MatchRule]) -> Result<bool> {
        let options = options::to_source_options(&self.info, rules);
        self.storage.delete_blob(self.id(), options).await
    }

    /// Copies this blob to `target`, returning a handle for the new blob.
    ///
    /// Any [MatchRule]s become preconditions on the *source* blob, pinned to
    /// this handle's snapshot.
    pub async fn copy_to<T: Into<BlobId>>(&self, target: T, rules: &[MatchRule]) -> Result<Blob> {
        let request = CopyRequest::new(self.id(), target)
            .set_source_options(options::to_source_options(&self.info, rules));
        self.storage.copy_blob(request).await
    }
}
