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

//! The HTTP transport for the Stratus Object Store JSON API.

use crate::batch::{BatchRequest, BatchResponse, BatchResult};
use crate::client::Credentials;
use crate::model::{BlobId, BlobInfo, BucketInfo, CopyRequest};
use crate::options::{GetOption, SourceOption, TargetOption};
use crate::{Error, Result};
use gax::error::rpc::{Code, Status};

const DEFAULT_HOST: &str = "https://storage.stratus-cloud.dev";

/// The set of characters that are percent encoded when they appear in a blob
/// name or query string.
const ENCODED_CHARS: percent_encoding::AsciiSet = percent_encoding::CONTROLS
    .add(b'!')
    .add(b'#')
    .add(b'$')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'*')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b']')
    .add(b' ');

fn enc(value: &str) -> String {
    percent_encoding::utf8_percent_encode(value, &ENCODED_CHARS).to_string()
}

/// Implements the service trait over the JSON API.
#[derive(Debug)]
pub(crate) struct HttpStorage {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpStorage {
    pub(crate) fn new(endpoint: Option<String>, credentials: Credentials) -> Result<Self> {
        let mut headers = http::HeaderMap::new();
        if let Credentials::Bearer(token) = &credentials {
            let mut value = http::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(Error::authentication)?;
            value.set_sensitive(true);
            headers.insert(http::header::AUTHORIZATION, value);
        }
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(Error::io)?;
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_HOST.to_string());
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn blob_url(&self, id: &BlobId) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}",
            self.endpoint,
            id.bucket,
            enc(&id.name)
        )
    }

    fn bucket_url(&self, name: &str) -> String {
        format!("{}/storage/v1/b/{}", self.endpoint, name)
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        query: Vec<(&'static str, String)>,
    ) -> Result<reqwest::Response> {
        let builder = if query.is_empty() {
            builder
        } else {
            builder.query(&query)
        };
        let request = builder.build().map_err(Error::ser)?;
        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");
        let response = self.client.execute(request).await.map_err(Error::io)?;
        if !response.status().is_success() {
            return Err(to_http_error(response).await);
        }
        Ok(response)
    }

    async fn deserialize<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let body = response.bytes().await.map_err(Error::io)?;
        serde_json::from_slice(&body).map_err(Error::deser)
    }
}

async fn to_http_error(response: reqwest::Response) -> Error {
    let status_code = response.status().as_u16();
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => return Error::io(e),
    };
    let status = match Status::try_from(body.as_ref()) {
        Ok(status) => status,
        Err(_) => Status::default()
            .set_code(Code::from_http_status(status_code))
            .set_message(String::from_utf8_lossy(&body).into_owned()),
    };
    Error::service_with_http_status(status, status_code)
}

fn generation_param(id: &BlobId) -> Option<(&'static str, String)> {
    id.generation.map(|g| ("generation", g.to_string()))
}

/// Folds an item outcome into a [BatchResult], keeping transport failures as
/// errors for the batch as a whole.
fn fold<T>(result: Result<T>) -> Result<BatchResult<T>> {
    match result {
        Ok(v) => Ok(BatchResult::success(v)),
        Err(e) => match e.status() {
            Some(status) => Ok(BatchResult::failure(status.clone())),
            None => Err(e),
        },
    }
}

#[async_trait::async_trait]
impl crate::stub::Storage for HttpStorage {
    async fn get_blob(&self, id: BlobId, options: Vec<GetOption>) -> Result<Option<BlobInfo>> {
        let builder = self.client.get(self.blob_url(&id));
        let mut query: Vec<_> = options.iter().map(GetOption::query_parameter).collect();
        query.extend(generation_param(&id));
        match self.send(builder, query).await {
            Ok(response) => Ok(Some(Self::deserialize(response).await?)),
            Err(e) if e.http_status_code() == Some(404) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn update_blob(&self, info: BlobInfo, options: Vec<TargetOption>) -> Result<BlobInfo> {
        let builder = self.client.put(self.blob_url(&info.id())).json(&info);
        let query = options.iter().map(TargetOption::query_parameter).collect();
        let response = self.send(builder, query).await?;
        Self::deserialize(response).await
    }

    async fn delete_blob(&self, id: BlobId, options: Vec<SourceOption>) -> Result<bool> {
        let builder = self.client.delete(self.blob_url(&id));
        let mut query: Vec<_> = options.iter().map(SourceOption::query_parameter).collect();
        query.extend(generation_param(&id));
        match self.send(builder, query).await {
            Ok(_) => Ok(true),
            Err(e) if e.http_status_code() == Some(404) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn get_bucket(&self, name: String, options: Vec<GetOption>) -> Result<Option<BucketInfo>> {
        let builder = self.client.get(self.bucket_url(&name));
        let query = options.iter().map(GetOption::query_parameter).collect();
        match self.send(builder, query).await {
            Ok(response) => Ok(Some(Self::deserialize(response).await?)),
            Err(e) if e.http_status_code() == Some(404) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn update_bucket(&self, info: BucketInfo, options: Vec<TargetOption>) -> Result<BucketInfo> {
        let builder = self.client.put(self.bucket_url(&info.name)).json(&info);
        let query = options.iter().map(TargetOption::query_parameter).collect();
        let response = self.send(builder, query).await?;
        Self::deserialize(response).await
    }

    async fn delete_bucket(&self, name: String, options: Vec<SourceOption>) -> Result<bool> {
        let builder = self.client.delete(self.bucket_url(&name));
        let query = options.iter().map(SourceOption::query_parameter).collect();
        match self.send(builder, query).await {
            Ok(_) => Ok(true),
            Err(e) if e.http_status_code() == Some(404) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn copy_blob(&self, request: CopyRequest) -> Result<BlobInfo> {
        let url = format!(
            "{}/storage/v1/b/{}/o/{}/copyTo/b/{}/o/{}",
            self.endpoint,
            request.source.bucket,
            enc(&request.source.name),
            request.target.bucket,
            enc(&request.target.name),
        );
        let builder = self.client.post(url);
        let mut query: Vec<_> = request
            .source_options
            .iter()
            .map(SourceOption::query_parameter)
            .collect();
        query.extend(generation_param(&request.source));
        let response = self.send(builder, query).await?;
        Self::deserialize(response).await
    }

    async fn submit_batch(&self, request: BatchRequest) -> Result<BatchResponse> {
        use crate::stub::Storage;
        // The JSON API has no batch endpoint; the items run as individual
        // requests over the shared connection pool. Per-item service errors
        // become failed results, transport errors fail the whole batch.
        let gets = futures::future::join_all(
            request
                .gets()
                .iter()
                .map(|(id, options)| self.get_blob(id.clone(), options.clone())),
        );
        let updates = futures::future::join_all(
            request
                .updates()
                .iter()
                .map(|(info, options)| self.update_blob(info.clone(), options.clone())),
        );
        let deletes = futures::future::join_all(
            request
                .deletes()
                .iter()
                .map(|(id, options)| self.delete_blob(id.clone(), options.clone())),
        );
        let (gets, updates, deletes) = futures::join!(gets, updates, deletes);
        Ok(BatchResponse::new(
            gets.into_iter().map(fold).collect::<Result<_>>()?,
            updates.into_iter().map(fold).collect::<Result<_>>()?,
            deletes.into_iter().map(fold).collect::<Result<_>>()?,
        ))
    }
}
