//!
//! Deployment records of an application.
//!
//! ```no_run
//! # async fn run(client: &newrelic_client::Client) -> newrelic_client::Result<()> {
//! let deployments = client.deployments();
//!
//! // Second page of the deployments of application 1234
//! let page = deployments.list(Some(1234), Some(2)).await?;
//! # Ok(())
//! # }
//! ```
use crate::{Filters, Result, Transport};
use serde_json::json;

const DEPLOYMENTS: &str = "deployments.json";

/// The deployments resource, borrowing the transport it issues calls on
#[derive(Debug)]
pub struct Deployments<'a, T: Transport + ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> Deployments<'a, T> {
    /// Create the resource on top of `transport`
    pub const fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// List the deployments, optionally filtered by application and page.
    ///
    /// Paginated results carry an additional `pages` key, see
    /// [`crate::pagination`].
    pub async fn list(
        &self,
        application_id: Option<u64>,
        page: Option<u64>,
    ) -> Result<serde_json::Value> {
        let filters = Filters::new()
            .push("filter[id]", application_id)
            .push("page", page);

        self.transport.get(DEPLOYMENTS, filters.build().as_deref()).await
    }

    /// Record a deployment of an application.
    ///
    /// The server assigns the id and, since none is sent, sets the timestamp
    /// to the current time in UTC.
    pub async fn create(
        &self,
        application_id: u64,
        revision: &str,
        changelog: &str,
        description: &str,
        user: &str,
    ) -> Result<serde_json::Value> {
        let filters = Filters::new().push("filter[id]", Some(application_id));

        let data = json!({
            "deployment": {
                "revision": revision,
                "changelog": changelog,
                "description": description,
                "user": user
            }
        });

        self.transport
            .post(DEPLOYMENTS, filters.build().as_deref(), &data)
            .await
    }

    /// Delete a deployment record. Requires an admin API key.
    pub async fn delete(&self, application_id: u64, id: u64) -> Result<serde_json::Value> {
        let path = format!("deployments/application_id={application_id}&id={id}.json");
        self.transport.delete(&path).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Error;
    use std::sync::Mutex;

    #[derive(Debug, PartialEq)]
    enum Call {
        Get(String, Option<String>),
        Post(String, Option<String>, serde_json::Value),
        Delete(String),
    }

    /// Records every call and answers with a canned response
    struct Recorder {
        calls: Mutex<Vec<Call>>,
        fail_with: Option<u16>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_with: None,
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                fail_with: Some(status),
                ..Self::new()
            }
        }

        fn respond(&self, call: Call) -> Result<serde_json::Value> {
            self.calls.lock().unwrap().push(call);
            match self.fail_with {
                Some(status) => Err(Error::WebServer(status, "unavailable".to_string())),
                None => Ok(json!({"deployment": {"id": 99}})),
            }
        }

        fn calls(&self) -> Vec<Call> {
            std::mem::take(&mut *self.calls.lock().unwrap())
        }
    }

    #[async_trait::async_trait]
    impl Transport for Recorder {
        async fn get(&self, path: &str, params: Option<&str>) -> Result<serde_json::Value> {
            self.respond(Call::Get(path.into(), params.map(Into::into)))
        }

        async fn post(
            &self,
            path: &str,
            params: Option<&str>,
            data: &serde_json::Value,
        ) -> Result<serde_json::Value> {
            self.respond(Call::Post(path.into(), params.map(Into::into), data.clone()))
        }

        async fn delete(&self, path: &str) -> Result<serde_json::Value> {
            self.respond(Call::Delete(path.into()))
        }
    }

    #[tokio::test]
    async fn list_without_filters() {
        let recorder = Recorder::new();
        Deployments::new(&recorder).list(None, None).await.unwrap();
        assert_eq!(
            recorder.calls(),
            vec![Call::Get("deployments.json".into(), None)]
        );
    }

    #[tokio::test]
    async fn list_filters() {
        let recorder = Recorder::new();
        let deployments = Deployments::new(&recorder);

        deployments.list(Some(42), None).await.unwrap();
        deployments.list(None, Some(3)).await.unwrap();
        deployments.list(Some(42), Some(3)).await.unwrap();

        assert_eq!(
            recorder.calls(),
            vec![
                Call::Get("deployments.json".into(), Some("filter[id]=42".into())),
                Call::Get("deployments.json".into(), Some("page=3".into())),
                Call::Get(
                    "deployments.json".into(),
                    Some("filter[id]=42&page=3".into())
                ),
            ]
        );
    }

    #[tokio::test]
    async fn create() {
        let recorder = Recorder::new();
        let resp = Deployments::new(&recorder)
            .create(1, "abc", "c", "d", "u")
            .await
            .unwrap();
        assert_eq!(resp["deployment"]["id"], 99);

        assert_eq!(
            recorder.calls(),
            vec![Call::Post(
                "deployments.json".into(),
                Some("filter[id]=1".into()),
                json!({
                    "deployment": {
                        "revision": "abc",
                        "changelog": "c",
                        "description": "d",
                        "user": "u"
                    }
                })
            )]
        );
    }

    #[tokio::test]
    async fn create_without_application() {
        let recorder = Recorder::new();
        Deployments::new(&recorder)
            .create(0, "abc", "", "", "")
            .await
            .unwrap();

        match &recorder.calls()[..] {
            [Call::Post(path, params, data)] => {
                assert_eq!(path, "deployments.json");
                assert_eq!(params, &None);
                assert!(data["deployment"].get("application_id").is_none());
            }
            calls => panic!("unexpected calls {calls:?}"),
        }
    }

    #[tokio::test]
    async fn delete() {
        let recorder = Recorder::new();
        Deployments::new(&recorder).delete(1, 99).await.unwrap();
        assert_eq!(
            recorder.calls(),
            vec![Call::Delete("deployments/application_id=1&id=99.json".into())]
        );
    }

    #[tokio::test]
    async fn transport_errors_pass_through() {
        let recorder = Recorder::failing(503);
        let deployments = Deployments::new(&recorder);

        let res = deployments.list(Some(1), None).await;
        assert!(matches!(res, Err(Error::WebServer(503, ref msg)) if msg == "unavailable"));

        let res = deployments.create(1, "abc", "c", "d", "u").await;
        assert!(matches!(res, Err(Error::WebServer(503, _))));

        let res = deployments.delete(1, 99).await;
        assert!(matches!(res, Err(Error::WebServer(503, _))));
    }

    #[test]
    fn client_resource() {
        let client = crate::ClientBuilder::new("key").build().unwrap();
        let deployments = client.deployments();
        assert_eq!(
            deployments.transport.base_url().as_str(),
            crate::DEFAULT_BASE_URL
        );
    }
}
