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

//! Custom errors for the storage client.
//!
//! The storage client defines additional error types. These are returned as
//! the `source()` of an [Error][crate::Error].

/// Indicates that a handle operation received metadata for a different
/// resource than the one the handle is bound to.
///
/// [Blob::update][crate::Blob::update] and
/// [Bucket::update][crate::Bucket::update] replace the metadata of the
/// resource the handle refers to; they cannot rename it or move it to a
/// different bucket. Use copy and delete operations for that.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum HandleMismatch {
    /// The new metadata names a different bucket.
    #[error("bucket name must match: the handle refers to `{want}`, the new metadata to `{got}`")]
    Bucket { got: String, want: String },

    /// The new metadata names a different blob.
    #[error("blob name must match: the handle refers to `{want}`, the new metadata to `{got}`")]
    Name { got: String, want: String },
}
