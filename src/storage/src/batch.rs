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

//! Request batching with per-item outcome correlation.
//!
//! A [BatchRequest] accumulates independent get, update, and delete
//! operations and is submitted as one logical call through
//! [submit_batch][crate::stub::Storage::submit_batch]. The returned
//! [BatchResponse] holds one [BatchResult] per accumulated operation, in the
//! order the operations were added. One item's failure never affects its
//! siblings; the submission itself only fails on transport or
//! authentication problems.

use crate::Result;
use crate::model::{BlobId, BlobInfo};
use crate::options::{GetOption, SourceOption, TargetOption};
use gax::error::Error;
use gax::error::rpc::Status;

/// The outcome of a single operation within a batch.
///
/// Holds either the operation's value or the [Status] describing its
/// failure, never both.
///
/// # Example
/// ```
/// use stratus_storage::batch::BatchResult;
/// use gax::error::rpc::{Code, Status};
/// let ok = BatchResult::success(true);
/// assert!(!ok.failed());
///
/// let failed = BatchResult::<bool>::failure(
///     Status::default().set_code(Code::PermissionDenied));
/// assert!(failed.failed());
/// let err = failed.get().unwrap_err();
/// assert_eq!(err.status().map(|s| s.code), Some(Code::PermissionDenied));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BatchResult<T> {
    inner: std::result::Result<T, Status>,
}

impl<T> BatchResult<T> {
    /// Creates a successful result.
    pub fn success(value: T) -> Self {
        Self { inner: Ok(value) }
    }

    /// Creates a failed result.
    pub fn failure<S: Into<Status>>(status: S) -> Self {
        Self {
            inner: Err(status.into()),
        }
    }

    /// Returns the value, or the stored failure as a service error.
    ///
    /// The returned error carries the exact status the service reported for
    /// this item, the same way a single-item call would have surfaced it.
    pub fn get(&self) -> Result<&T> {
        match &self.inner {
            Ok(v) => Ok(v),
            Err(status) => Err(Error::service(status.clone())),
        }
    }

    /// Returns `true` if the operation failed.
    pub fn failed(&self) -> bool {
        self.inner.is_err()
    }

    /// Returns the stored failure, or `None` if the operation succeeded.
    pub fn status(&self) -> Option<&Status> {
        self.inner.as_ref().err()
    }

    /// Consumes the result, returning the value or the failure status.
    pub fn into_inner(self) -> std::result::Result<T, Status> {
        self.inner
    }
}

/// A set of independent operations to be submitted as one logical call.
///
/// Operations accumulate in three kinds: get, update, and delete. Within a
/// kind the entries keep insertion order, and each blob id appears at most
/// once: re-adding an id replaces the earlier entry (last write wins) while
/// keeping its original position.
///
/// A request performs no network activity. It is built, submitted exactly
/// once through [submit_batch][crate::stub::Storage::submit_batch], and then
/// discarded. Submitting an equal request again produces an independent
/// fresh response.
///
/// # Example
/// ```
/// use stratus_storage::batch::BatchRequest;
/// use stratus_storage::model::BlobId;
/// let request = BatchRequest::new()
///     .get(BlobId::new("b", "n1"), vec![])
///     .get(BlobId::new("b", "n2"), vec![])
///     .delete(BlobId::new("b", "n3"), vec![]);
/// assert_eq!(request.gets().len(), 2);
/// assert_eq!(request.deletes().len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchRequest {
    gets: Vec<(BlobId, Vec<GetOption>)>,
    updates: Vec<(BlobInfo, Vec<TargetOption>)>,
    deletes: Vec<(BlobId, Vec<SourceOption>)>,
}

impl BatchRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a get operation for `id`.
    pub fn get<I: Into<BlobId>>(mut self, id: I, options: Vec<GetOption>) -> Self {
        upsert(&mut self.gets, id.into(), options);
        self
    }

    /// Adds an update operation replacing the blob's metadata with `info`.
    ///
    /// The target blob is identified by `info`'s bucket and name.
    pub fn update(mut self, info: BlobInfo, options: Vec<TargetOption>) -> Self {
        let key = info.id();
        if let Some(entry) = self.updates.iter_mut().find(|(i, _)| i.id() == key) {
            *entry = (info, options);
        } else {
            self.updates.push((info, options));
        }
        self
    }

    /// Adds a delete operation for `id`.
    pub fn delete<I: Into<BlobId>>(mut self, id: I, options: Vec<SourceOption>) -> Self {
        upsert(&mut self.deletes, id.into(), options);
        self
    }

    /// The accumulated get operations, in insertion order.
    pub fn gets(&self) -> &[(BlobId, Vec<GetOption>)] {
        &self.gets
    }

    /// The accumulated update operations, in insertion order.
    pub fn updates(&self) -> &[(BlobInfo, Vec<TargetOption>)] {
        &self.updates
    }

    /// The accumulated delete operations, in insertion order.
    pub fn deletes(&self) -> &[(BlobId, Vec<SourceOption>)] {
        &self.deletes
    }

    /// Returns `true` if no operations have been added.
    pub fn is_empty(&self) -> bool {
        self.gets.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }
}

fn upsert<O>(entries: &mut Vec<(BlobId, Vec<O>)>, id: BlobId, options: Vec<O>) {
    if let Some(entry) = entries.iter_mut().find(|(k, _)| *k == id) {
        entry.1 = options;
    } else {
        entries.push((id, options));
    }
}

/// The per-item outcomes of a submitted [BatchRequest].
///
/// Within each kind, item *i* corresponds to the *i*-th operation added to
/// that kind in the originating request. The service never reorders items.
///
/// A get for a missing blob is a *successful* result holding `None`, and a
/// delete for a missing blob a successful `false`; an update for a missing
/// blob fails with [NOT_FOUND][gax::error::rpc::Code::NotFound].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchResponse {
    gets: Vec<BatchResult<Option<BlobInfo>>>,
    updates: Vec<BatchResult<BlobInfo>>,
    deletes: Vec<BatchResult<bool>>,
}

impl BatchResponse {
    /// Assembles a response from per-kind outcome sequences.
    ///
    /// The sequences must mirror the originating request's per-kind entries
    /// in length and order.
    pub fn new(
        gets: Vec<BatchResult<Option<BlobInfo>>>,
        updates: Vec<BatchResult<BlobInfo>>,
        deletes: Vec<BatchResult<bool>>,
    ) -> Self {
        Self {
            gets,
            updates,
            deletes,
        }
    }

    /// The outcomes of the get operations, in request order.
    pub fn gets(&self) -> &[BatchResult<Option<BlobInfo>>] {
        &self.gets
    }

    /// The outcomes of the update operations, in request order.
    pub fn updates(&self) -> &[BatchResult<BlobInfo>] {
        &self.updates
    }

    /// The outcomes of the delete operations, in request order.
    pub fn deletes(&self) -> &[BatchResult<bool>] {
        &self.deletes
    }

    /// Consumes the response, returning the three outcome sequences in
    /// (gets, updates, deletes) order.
    pub fn into_parts(
        self,
    ) -> (
        Vec<BatchResult<Option<BlobInfo>>>,
        Vec<BatchResult<BlobInfo>>,
        Vec<BatchResult<bool>>,
    ) {
        (self.gets, self.updates, self.deletes)
    }
}
