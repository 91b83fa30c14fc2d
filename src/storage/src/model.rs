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

//! The resource model for the Stratus Object Store.
//!
//! All types in this module are immutable value types: "mutations" are
//! expressed by building a new value with the `set_*` methods. The metadata
//! snapshots ([BlobInfo], [BucketInfo]) represent the server-side state of a
//! resource at some point in time; a fresh snapshot is obtained with a `get`
//! or `reload` operation, never by mutating an existing one.

use crate::options::SourceOption;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The identifier of a blob: the bucket name, the blob name, and optionally
/// a specific generation.
///
/// Without a generation the id refers to the live version of the blob.
///
/// # Example
/// ```
/// use stratus_storage::model::BlobId;
/// let id = BlobId::new("my-bucket", "my-object").with_generation(1234);
/// assert_eq!(format!("{id}"), "my-bucket/my-object#1234");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlobId {
    /// The name of the bucket containing the blob.
    pub bucket: String,

    /// The name of the blob within its bucket.
    pub name: String,

    /// The blob generation, if the id refers to a specific one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<i64>,
}

impl BlobId {
    /// Creates an id for the live version of `bucket/name`.
    pub fn new<B: Into<String>, N: Into<String>>(bucket: B, name: N) -> Self {
        Self {
            bucket: bucket.into(),
            name: name.into(),
            generation: None,
        }
    }

    /// Returns the same id pinned to a specific generation.
    pub fn with_generation(mut self, generation: i64) -> Self {
        self.generation = Some(generation);
        self
    }
}

impl std::fmt::Display for BlobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bucket, self.name)?;
        if let Some(g) = self.generation {
            write!(f, "#{g}")?;
        }
        Ok(())
    }
}

impl From<&BlobId> for BlobId {
    fn from(value: &BlobId) -> Self {
        value.clone()
    }
}

/// A snapshot of a blob's metadata.
///
/// See the [module][crate::model] documentation on immutability. 64-bit
/// counters are encoded as strings on the wire, matching the service's JSON
/// representation.
#[serde_with::serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct BlobInfo {
    /// The name of the bucket containing the blob.
    pub bucket: String,

    /// The name of the blob within its bucket.
    pub name: String,

    /// The content generation. Incremented every time the blob's data is
    /// overwritten.
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub generation: i64,

    /// The metadata generation. Incremented every time the blob's metadata
    /// changes, reset when the content generation changes.
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub metageneration: i64,

    /// The size of the blob's data in bytes.
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub size: u64,

    /// The `Content-Type` of the blob's data.
    pub content_type: String,

    /// The storage class of the blob.
    pub storage_class: String,

    /// HTTP 1.1 entity tag for the blob.
    pub etag: String,

    /// The `Content-Encoding` of the blob's data.
    pub content_encoding: String,

    /// The `Cache-Control` directive for the blob's data.
    pub cache_control: String,

    /// User-provided metadata, in key/value pairs.
    pub metadata: HashMap<String, String>,

    /// The creation time of the blob.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_created: Option<DateTime<Utc>>,

    /// The last metadata update time of the blob.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl BlobInfo {
    /// Creates an empty snapshot. Mostly useful as a starting point for the
    /// `set_*` methods.
    pub fn new() -> Self {
        Self::default()
    }

    /// The id of the live version of this blob.
    pub fn id(&self) -> BlobId {
        BlobId::new(self.bucket.clone(), self.name.clone())
    }

    /// Sets the value for [bucket][BlobInfo::bucket].
    pub fn set_bucket<T: Into<String>>(mut self, v: T) -> Self {
        self.bucket = v.into();
        self
    }

    /// Sets the value for [name][BlobInfo::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value for [generation][BlobInfo::generation].
    pub fn set_generation<T: Into<i64>>(mut self, v: T) -> Self {
        self.generation = v.into();
        self
    }

    /// Sets the value for [metageneration][BlobInfo::metageneration].
    pub fn set_metageneration<T: Into<i64>>(mut self, v: T) -> Self {
        self.metageneration = v.into();
        self
    }

    /// Sets the value for [size][BlobInfo::size].
    pub fn set_size<T: Into<u64>>(mut self, v: T) -> Self {
        self.size = v.into();
        self
    }

    /// Sets the value for [content_type][BlobInfo::content_type].
    pub fn set_content_type<T: Into<String>>(mut self, v: T) -> Self {
        self.content_type = v.into();
        self
    }

    /// Sets the value for [storage_class][BlobInfo::storage_class].
    pub fn set_storage_class<T: Into<String>>(mut self, v: T) -> Self {
        self.storage_class = v.into();
        self
    }

    /// Sets the value for [etag][BlobInfo::etag].
    pub fn set_etag<T: Into<String>>(mut self, v: T) -> Self {
        self.etag = v.into();
        self
    }

    /// Sets the value for [content_encoding][BlobInfo::content_encoding].
    pub fn set_content_encoding<T: Into<String>>(mut self, v: T) -> Self {
        self.content_encoding = v.into();
        self
    }

    /// Sets the value for [cache_control][BlobInfo::cache_control].
    pub fn set_cache_control<T: Into<String>>(mut self, v: T) -> Self {
        self.cache_control = v.into();
        self
    }

    /// Sets the value for [metadata][BlobInfo::metadata].
    pub fn set_metadata<K, V, T>(mut self, v: T) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        T: IntoIterator<Item = (K, V)>,
    {
        self.metadata = v.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    /// Sets the value for [time_created][BlobInfo::time_created].
    pub fn set_time_created<T: Into<DateTime<Utc>>>(mut self, v: T) -> Self {
        self.time_created = Some(v.into());
        self
    }

    /// Sets the value for [updated][BlobInfo::updated].
    pub fn set_updated<T: Into<DateTime<Utc>>>(mut self, v: T) -> Self {
        self.updated = Some(v.into());
        self
    }
}

/// A snapshot of a bucket's metadata.
#[serde_with::serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct BucketInfo {
    /// The name of the bucket.
    pub name: String,

    /// The location of the bucket's data.
    pub location: String,

    /// The default storage class for blobs in the bucket.
    pub storage_class: String,

    /// The metadata generation of the bucket. Buckets have no content
    /// generation.
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub metageneration: i64,

    /// Whether blob versioning is enabled for the bucket.
    pub versioning_enabled: bool,

    /// User-provided labels, in key/value pairs.
    pub labels: HashMap<String, String>,

    /// The creation time of the bucket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_created: Option<DateTime<Utc>>,

    /// The last metadata update time of the bucket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl BucketInfo {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value for [name][BucketInfo::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value for [location][BucketInfo::location].
    pub fn set_location<T: Into<String>>(mut self, v: T) -> Self {
        self.location = v.into();
        self
    }

    /// Sets the value for [storage_class][BucketInfo::storage_class].
    pub fn set_storage_class<T: Into<String>>(mut self, v: T) -> Self {
        self.storage_class = v.into();
        self
    }

    /// Sets the value for [metageneration][BucketInfo::metageneration].
    pub fn set_metageneration<T: Into<i64>>(mut self, v: T) -> Self {
        self.metageneration = v.into();
        self
    }

    /// Sets the value for [versioning_enabled][BucketInfo::versioning_enabled].
    pub fn set_versioning_enabled(mut self, v: bool) -> Self {
        self.versioning_enabled = v;
        self
    }

    /// Sets the value for [labels][BucketInfo::labels].
    pub fn set_labels<K, V, T>(mut self, v: T) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        T: IntoIterator<Item = (K, V)>,
    {
        self.labels = v.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    /// Sets the value for [time_created][BucketInfo::time_created].
    pub fn set_time_created<T: Into<DateTime<Utc>>>(mut self, v: T) -> Self {
        self.time_created = Some(v.into());
        self
    }

    /// Sets the value for [updated][BucketInfo::updated].
    pub fn set_updated<T: Into<DateTime<Utc>>>(mut self, v: T) -> Self {
        self.updated = Some(v.into());
        self
    }
}

/// A request to copy a blob, possibly across buckets.
///
/// The service may perform the copy in multiple rounds; the transport hides
/// any such looping and the operation completes with the metadata of the new
/// blob.
///
/// # Example
/// ```
/// use stratus_storage::model::{BlobId, CopyRequest};
/// use stratus_storage::options::SourceOption;
/// let request = CopyRequest::new(
///         BlobId::new("my-bucket", "my-object"),
///         BlobId::new("backup-bucket", "my-object"),
///     )
///     .set_source_options([SourceOption::GenerationMatch(1234)]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct CopyRequest {
    /// The blob to copy from.
    pub source: BlobId,

    /// Preconditions on the source blob.
    pub source_options: Vec<SourceOption>,

    /// The blob to copy to.
    pub target: BlobId,
}

impl CopyRequest {
    /// Creates a request to copy `source` to `target` without preconditions.
    pub fn new<S: Into<BlobId>, T: Into<BlobId>>(source: S, target: T) -> Self {
        Self {
            source: source.into(),
            source_options: Vec::new(),
            target: target.into(),
        }
    }

    /// Sets the value for [source_options][CopyRequest::source_options].
    pub fn set_source_options<T: IntoIterator<Item = SourceOption>>(mut self, v: T) -> Self {
        self.source_options = v.into_iter().collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn blob_id_display() {
        let id = BlobId::new("b", "n");
        assert_eq!(format!("{id}"), "b/n");
        let id = id.with_generation(7);
        assert_eq!(format!("{id}"), "b/n#7");
    }

    #[test]
    fn blob_id_as_map_key() {
        let mut map = HashMap::new();
        map.insert(BlobId::new("b", "n"), 1);
        assert_eq!(map.get(&BlobId::new("b", "n")), Some(&1));
        assert_eq!(map.get(&BlobId::new("b", "other")), None);
    }

    #[test]
    fn blob_info_deserialize() -> Result<()> {
        let object: BlobInfo = serde_json::from_value(json!({
            "name": "test-object.txt",
            "bucket": "my-bucket",
            "contentType": "text/plain",
            "storageClass": "STANDARD",
            // 64-bit counters arrive as strings:
            "generation": "123",
            "metageneration": "456",
            "size": "789",
            "metadata": {"owner": "team-a"},
            "timeCreated": "2025-05-13T10:30:00Z",
        }))?;

        let want = BlobInfo::new()
            .set_name("test-object.txt")
            .set_bucket("my-bucket")
            .set_content_type("text/plain")
            .set_storage_class("STANDARD")
            .set_generation(123)
            .set_metageneration(456)
            .set_size(789_u64)
            .set_metadata([("owner", "team-a")])
            .set_time_created(
                DateTime::parse_from_rfc3339("2025-05-13T10:30:00Z")?.with_timezone(&Utc),
            );
        assert_eq!(object, want);
        Ok(())
    }

    #[test]
    fn blob_info_serialize_counters_as_strings() -> Result<()> {
        let info = BlobInfo::new()
            .set_bucket("b")
            .set_name("n")
            .set_generation(5)
            .set_size(10_u64);
        let got = serde_json::to_value(&info)?;
        assert_eq!(got["generation"], json!("5"));
        assert_eq!(got["size"], json!("10"));
        Ok(())
    }

    #[test]
    fn blob_info_id() {
        let info = BlobInfo::new().set_bucket("b").set_name("n").set_generation(3);
        // The id refers to the live version, not the snapshot's generation.
        assert_eq!(info.id(), BlobId::new("b", "n"));
    }

    #[test]
    fn bucket_info_roundtrip() -> Result<()> {
        let info = BucketInfo::new()
            .set_name("my-bucket")
            .set_location("EU")
            .set_storage_class("STANDARD")
            .set_metageneration(2)
            .set_versioning_enabled(true)
            .set_labels([("env", "prod")]);
        let value = serde_json::to_value(&info)?;
        assert_eq!(value["metageneration"], json!("2"));
        let back: BucketInfo = serde_json::from_value(value)?;
        assert_eq!(back, info);
        Ok(())
    }

    #[test]
    fn copy_request() {
        let request = CopyRequest::new(BlobId::new("b1", "n1"), BlobId::new("b2", "n2"))
            .set_source_options([SourceOption::GenerationMatch(7)]);
        assert_eq!(request.source, BlobId::new("b1", "n1"));
        assert_eq!(request.target, BlobId::new("b2", "n2"));
        assert_eq!(request.source_options, vec![SourceOption::GenerationMatch(7)]);
    }
}
