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
use crate::model::{BlobId, BucketInfo};
use crate::options::{GetOption, SourceOption, TargetOption};
use crate::{Blob, Error, Result};

/// A handle to a bucket: a metadata snapshot paired with the client that
/// produced it.
///
/// Like [Blob], a handle never mutates in place; see the [Blob]
/// documentation for the snapshot semantics. Buckets have no content
/// generation, so the only meaningful preconditions are on the metadata
/// generation and they are passed as explicit options.
#[derive(Clone, Debug)]
pub struct Bucket {
    storage: Storage,
    info: BucketInfo,
}

impl Bucket {
    pub(crate) fn new(storage: Storage, info: BucketInfo) -> Self {
        Self { storage, info }
    }

    /// The metadata snapshot this handle carries.
    pub fn info(&self) -> &BucketInfo {
        &self.info
    }

    /// The name of this bucket.
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// The client this handle is bound to.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Checks if this bucket still exists.
    pub async fn exists(&self, options: Vec<GetOption>) -> Result<bool> {
        let info = self.storage.get_bucket(self.name(), options).await?;
        Ok(info.is_some())
    }

    /// Fetches a fresh snapshot of this bucket, or `None` if it no longer
    /// exists.
    pub async fn reload(&self, options: Vec<GetOption>) -> Result<Option<Bucket>> {
        self.storage.get_bucket(self.name(), options).await
    }

    /// Replaces this bucket's metadata with `info`, returning a handle with
    /// the new snapshot.
    ///
    /// `info` must name the same bucket as this handle.
    pub async fn update(&self, info: BucketInfo, options: Vec<TargetOption>) -> Result<Bucket> {
        if info.name != self.info.name {
            return Err(Error::other(HandleMismatch::Bucket {
                got: info.name,
                want: self.info.name.clone(),
            }));
        }
        self.storage.update_bucket(info, options).await
    }

    /// Deletes this bucket. Returns `false` if it no longer exists.
    ///
    /// The service rejects deleting a non-empty bucket.
    pub async fn delete(&self, options: Vec<SourceOption>) -> Result<bool> {
        self.storage.delete_bucket(self.name(), options).await
    }

    /// Fetches a blob in this bucket, or `None` if it does not exist.
    pub async fn blob<N: Into<String>>(
        &self,
        name: N,
        options: Vec<GetOption>,
    ) -> Result<Option<Blob>> {
        let id = BlobId::new(self.name(), name);
        self.storage.get_blob(id, options).await
    }

    /// Fetches several blobs in this bucket using a single batch request.
    ///
    /// The returned list preserves positional correspondence with `names`;
    /// see [Storage::get_blobs].
    pub async fn blobs<I, N>(&self, names: I) -> Result<Vec<Option<Blob>>>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let ids: Vec<BlobId> = names
            .into_iter()
            .map(|name| BlobId::new(self.name(), name))
            .collect();
        self.storage.get_blobs(ids).await
    }
}
