//! Typed facade over the Logseq RPC methods the bridge uses.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use lsq_core::error::{LsqError, RpcError};
use lsq_core::{Block, Page};

use crate::config::ClientConfig;
use crate::transport::{HttpTransport, RpcTransport};

/// A referencing page and the blocks on it that reference the target.
pub type LinkedReference = (Page, Vec<Block>);

/// Options for `logseq.Editor.createPage`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageOptions {
    /// Navigate the Logseq UI to the new page.
    pub redirect: bool,
    pub create_first_block: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub journal: bool,
}

/// Options for `logseq.Editor.insertBlock`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InsertBlockOptions {
    /// Insert next to the target instead of as its child.
    pub sibling: bool,
    pub before: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Value>>,
}

/// Options for `logseq.Editor.moveBlock`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MoveBlockOptions {
    pub before: bool,
    /// Move under the target as its first child.
    pub children: bool,
}

/// Client for the Logseq HTTP API.
///
/// Cheap to clone; every method is exactly one remote call.
#[derive(Clone)]
pub struct LogseqClient {
    transport: Arc<dyn RpcTransport>,
}

impl std::fmt::Debug for LogseqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogseqClient").finish_non_exhaustive()
    }
}

impl LogseqClient {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    /// Client talking HTTP to a running Logseq instance.
    ///
    /// # Errors
    ///
    /// Returns [`LsqError::Config`] if the transport cannot be built.
    pub fn http(config: ClientConfig) -> Result<Self, LsqError> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    async fn invoke<T: DeserializeOwned>(
        &self,
        method: &str,
        args: Vec<Value>,
    ) -> Result<T, LsqError> {
        let value = self.transport.call(method, args).await?;
        serde_json::from_value::<T>(value).map_err(|e| {
            LsqError::from(RpcError::Decode {
                method: method.to_string(),
                message: e.to_string(),
            })
        })
    }

    async fn invoke_unit(&self, method: &str, args: Vec<Value>) -> Result<(), LsqError> {
        self.transport.call(method, args).await?;
        Ok(())
    }

    // === Pages ===

    pub async fn get_all_pages(&self) -> Result<Vec<Page>, LsqError> {
        let pages: Option<Vec<Page>> = self.invoke("logseq.Editor.getAllPages", vec![]).await?;
        Ok(pages.unwrap_or_default())
    }

    pub async fn get_page(&self, name: &str) -> Result<Option<Page>, LsqError> {
        self.invoke("logseq.Editor.getPage", vec![json!(name)])
            .await
    }

    pub async fn get_page_blocks_tree(&self, name: &str) -> Result<Option<Vec<Block>>, LsqError> {
        self.invoke("logseq.Editor.getPageBlocksTree", vec![json!(name)])
            .await
    }

    pub async fn create_page(
        &self,
        name: &str,
        properties: Option<&BTreeMap<String, Value>>,
        opts: &CreatePageOptions,
    ) -> Result<Option<Page>, LsqError> {
        let properties = properties.map_or_else(|| json!({}), |p| json!(p));
        self.invoke(
            "logseq.Editor.createPage",
            vec![json!(name), properties, json!(opts)],
        )
        .await
    }

    pub async fn append_block_in_page(
        &self,
        page: &str,
        content: &str,
    ) -> Result<Option<Block>, LsqError> {
        self.invoke(
            "logseq.Editor.appendBlockInPage",
            vec![json!(page), json!(content)],
        )
        .await
    }

    pub async fn delete_page(&self, name: &str) -> Result<(), LsqError> {
        self.invoke_unit("logseq.Editor.deletePage", vec![json!(name)])
            .await
    }

    pub async fn rename_page(&self, old_name: &str, new_name: &str) -> Result<(), LsqError> {
        self.invoke_unit(
            "logseq.Editor.renamePage",
            vec![json!(old_name), json!(new_name)],
        )
        .await
    }

    pub async fn get_page_linked_references(
        &self,
        name: &str,
    ) -> Result<Vec<LinkedReference>, LsqError> {
        let refs: Option<Vec<LinkedReference>> = self
            .invoke("logseq.Editor.getPageLinkedReferences", vec![json!(name)])
            .await?;
        Ok(refs.unwrap_or_default())
    }

    // === Blocks ===

    pub async fn get_block(
        &self,
        uuid: &str,
        include_children: bool,
    ) -> Result<Option<Block>, LsqError> {
        self.invoke(
            "logseq.Editor.getBlock",
            vec![json!(uuid), json!({ "includeChildren": include_children })],
        )
        .await
    }

    pub async fn insert_block(
        &self,
        target: &str,
        content: &str,
        opts: &InsertBlockOptions,
    ) -> Result<Option<Block>, LsqError> {
        self.invoke(
            "logseq.Editor.insertBlock",
            vec![json!(target), json!(content), json!(opts)],
        )
        .await
    }

    pub async fn update_block(
        &self,
        uuid: &str,
        content: &str,
        properties: Option<&BTreeMap<String, Value>>,
    ) -> Result<(), LsqError> {
        let mut args = vec![json!(uuid), json!(content)];
        if let Some(properties) = properties {
            args.push(json!({ "properties": properties }));
        }
        self.invoke_unit("logseq.Editor.updateBlock", args).await
    }

    pub async fn remove_block(&self, uuid: &str) -> Result<(), LsqError> {
        self.invoke_unit("logseq.Editor.removeBlock", vec![json!(uuid)])
            .await
    }

    pub async fn move_block(
        &self,
        uuid: &str,
        target_uuid: &str,
        opts: &MoveBlockOptions,
    ) -> Result<(), LsqError> {
        self.invoke_unit(
            "logseq.Editor.moveBlock",
            vec![json!(uuid), json!(target_uuid), json!(opts)],
        )
        .await
    }

    // === Queries ===

    /// Run a datascript query; each result row is one `:find` tuple.
    pub async fn datascript_query(&self, query: &str) -> Result<Vec<Vec<Value>>, LsqError> {
        let rows: Option<Vec<Vec<Value>>> = self
            .invoke("logseq.DB.datascriptQuery", vec![json!(query)])
            .await?;
        Ok(rows.unwrap_or_default())
    }

    /// Run a single-`pull` datascript query and decode the pulled entities.
    pub async fn pull_query<T: DeserializeOwned>(&self, query: &str) -> Result<Vec<T>, LsqError> {
        self.datascript_query(query)
            .await?
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .map(|value| {
                serde_json::from_value::<T>(value).map_err(|e| {
                    LsqError::from(RpcError::Decode {
                        method: "logseq.DB.datascriptQuery".to_string(),
                        message: e.to_string(),
                    })
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    fn client_with(mock: &Arc<MockTransport>) -> LogseqClient {
        LogseqClient::new(mock.clone())
    }

    #[tokio::test]
    async fn get_page_sends_name_and_decodes_null_as_none() {
        let mock = Arc::new(MockTransport::new());
        mock.reply("logseq.Editor.getPage", Value::Null);
        let client = client_with(&mock);

        let page = client.get_page("Missing").await.unwrap();
        assert!(page.is_none());

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "logseq.Editor.getPage");
        assert_eq!(calls[0].args, vec![json!("Missing")]);
    }

    #[tokio::test]
    async fn insert_block_passes_options_positionally() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(
            "logseq.Editor.insertBlock",
            json!({"uuid": "65a1b2c3-0000-4000-8000-000000000009", "content": "hi"}),
        );
        let client = client_with(&mock);

        let opts = InsertBlockOptions {
            sibling: true,
            before: false,
            properties: None,
        };
        let block = client
            .insert_block("Projects", "hi", &opts)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(block.content, "hi");

        assert_eq!(
            mock.calls()[0].args,
            vec![
                json!("Projects"),
                json!("hi"),
                json!({"sibling": true, "before": false})
            ]
        );
    }

    #[tokio::test]
    async fn create_page_defaults_properties_to_empty_object() {
        let mock = Arc::new(MockTransport::new());
        mock.reply("logseq.Editor.createPage", json!({"name": "new"}));
        let client = client_with(&mock);

        client
            .create_page("New", None, &CreatePageOptions::default())
            .await
            .unwrap();

        let args = &mock.calls()[0].args;
        assert_eq!(args[1], json!({}));
        assert_eq!(
            args[2],
            json!({"redirect": false, "createFirstBlock": false, "journal": false})
        );
    }

    #[tokio::test]
    async fn linked_references_decode_as_pairs() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(
            "logseq.Editor.getPageLinkedReferences",
            json!([[{"name": "daily", "originalName": "Daily"}, [{"content": "see [[Target]]"}]]]),
        );
        let client = client_with(&mock);

        let refs = client.get_page_linked_references("Target").await.unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].0.display_name(), "Daily");
        assert_eq!(refs[0].1[0].content, "see [[Target]]");
    }

    #[tokio::test]
    async fn pull_query_takes_first_column() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(
            "logseq.DB.datascriptQuery",
            json!([[{"name": "rust", "original-name": "Rust"}], [{"name": "go"}]]),
        );
        let client = client_with(&mock);

        let pages: Vec<Page> = client.pull_query("[:find ...]").await.unwrap();
        let names: Vec<&str> = pages.iter().map(Page::display_name).collect();
        assert_eq!(names, vec!["Rust", "go"]);
    }

    #[tokio::test]
    async fn unexpected_shape_is_a_decode_error() {
        let mock = Arc::new(MockTransport::new());
        mock.reply("logseq.Editor.getAllPages", json!({"not": "a list"}));
        let client = client_with(&mock);

        let err = client.get_all_pages().await.unwrap_err();
        assert!(matches!(err, LsqError::Rpc(RpcError::Decode { .. })));
    }
}
