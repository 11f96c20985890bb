use serde_json::Value;

use super::test_app::TestApp;

impl TestApp {
    /// Create a generation task for `asset_id` and return its JSON.
    pub async fn create_task(&self, asset_id: &str) -> Value {
        let resp = self
            .client
            .post(self.url("/api/task"))
            .json(&serde_json::json!({ "assetId": asset_id }))
            .send()
            .await
            .expect("Create task request failed");

        assert_eq!(resp.status().as_u16(), 201, "Create task failed");
        resp.json().await.unwrap()
    }

    pub async fn patch_task(&self, task_id: &str, body: Value) -> reqwest::Response {
        self.client
            .patch(self.url(&format!("/api/task/{task_id}")))
            .json(&body)
            .send()
            .await
            .expect("Patch task request failed")
    }

    /// Move a task to `status`, asserting the server accepted it.
    pub async fn advance_task(&self, task_id: &str, status: &str) -> Value {
        let resp = self
            .patch_task(task_id, serde_json::json!({ "status": status }))
            .await;
        assert_eq!(resp.status().as_u16(), 200, "Advance to {status} failed");
        resp.json().await.unwrap()
    }

    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed");
        let status = resp.status().as_u16();
        let json = resp.json().await.unwrap_or(Value::Null);
        (status, json)
    }
}
