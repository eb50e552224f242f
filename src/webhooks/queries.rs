//! GraphQL documents for webhook subscriptions and readers for their
//! responses.

use serde_json::Value;

use crate::webhooks::errors::WebhookError;
use crate::webhooks::types::{graphql_string, DeliveryMethod, WebhookTopic};

/// Query for the first subscription on `topic`, whatever its endpoint type.
pub(crate) fn check_query(topic: &WebhookTopic) -> String {
    format!(
        r#"{{
  webhookSubscriptions(first: 1, topics: {topic}) {{
    edges {{
      node {{
        id
        endpoint {{
          __typename
          ... on WebhookHttpEndpoint {{
            callbackUrl
          }}
          ... on WebhookEventBridgeEndpoint {{
            arn
          }}
          ... on WebhookPubSubEndpoint {{
            pubSubProject
            pubSubTopic
          }}
        }}
      }}
    }}
  }}
}}"#
    )
}

/// Create (no `id`) or update (with `id`) mutation for one subscription.
pub(crate) fn subscription_mutation(
    topic: &WebhookTopic,
    delivery_method: DeliveryMethod,
    address: &str,
    id: Option<&str>,
) -> String {
    let identifier = id.map_or_else(
        || format!("topic: {topic}"),
        |id| format!("id: {}", graphql_string(id)),
    );
    let name = delivery_method.mutation_name(id.is_some());
    let input = delivery_method.subscription_input(address);
    format!(
        r#"mutation webhookSubscription {{
  {name}({identifier}, webhookSubscription: {input}) {{
    userErrors {{
      field
      message
    }}
    webhookSubscription {{
      id
    }}
  }}
}}"#
    )
}

pub(crate) fn delete_mutation(id: &str) -> String {
    format!(
        r#"mutation webhookSubscriptionDelete {{
  webhookSubscriptionDelete(id: {id}) {{
    userErrors {{
      field
      message
    }}
    deletedWebhookSubscriptionId
  }}
}}"#,
        id = graphql_string(id)
    )
}

/// A subscription as the platform currently holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RemoteSubscription {
    pub id: String,
    pub delivery_method: Option<DeliveryMethod>,
    /// Callback URL, ARN or `pubsub://project:topic`, comparable with
    /// [`DeliveryMethod::build_address`].
    pub address: String,
}

/// Reads the first edge of a check query response.
pub(crate) fn existing_subscription(
    body: &Value,
) -> Result<Option<RemoteSubscription>, WebhookError> {
    let edges = body["data"]["webhookSubscriptions"]["edges"]
        .as_array()
        .ok_or_else(|| WebhookError::ShopifyError {
            message: "Invalid response structure".to_string(),
        })?;

    let Some(node) = edges.first().map(|edge| &edge["node"]) else {
        return Ok(None);
    };

    let id = node["id"]
        .as_str()
        .ok_or_else(|| WebhookError::ShopifyError {
            message: "Missing webhook ID".to_string(),
        })?
        .to_string();

    let endpoint = &node["endpoint"];
    let text = |field: &str| endpoint[field].as_str().unwrap_or_default();
    let (delivery_method, address) = match endpoint["__typename"].as_str() {
        Some("WebhookHttpEndpoint") => {
            (Some(DeliveryMethod::Http), text("callbackUrl").to_string())
        }
        Some("WebhookEventBridgeEndpoint") => {
            (Some(DeliveryMethod::EventBridge), text("arn").to_string())
        }
        Some("WebhookPubSubEndpoint") => (
            Some(DeliveryMethod::PubSub),
            format!("pubsub://{}:{}", text("pubSubProject"), text("pubSubTopic")),
        ),
        _ => (None, String::new()),
    };

    Ok(Some(RemoteSubscription {
        id,
        delivery_method,
        address,
    }))
}

/// A mutation succeeded when its payload carries a `webhookSubscription`.
pub(crate) fn mutation_succeeded(
    body: &Value,
    delivery_method: DeliveryMethod,
    update: bool,
) -> bool {
    body["data"][delivery_method.mutation_name(update)]["webhookSubscription"].is_object()
}

/// Joined `userErrors` messages of `mutation`, if any.
pub(crate) fn user_errors(body: &Value, mutation: &str) -> Option<String> {
    let errors = body["data"][mutation]["userErrors"].as_array()?;
    let messages: Vec<&str> = errors
        .iter()
        .filter_map(|error| error["message"].as_str())
        .collect();
    (!messages.is_empty()).then(|| messages.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_query_targets_topic() {
        let query = check_query(&WebhookTopic::new("products/create"));
        assert!(query.contains("webhookSubscriptions(first: 1, topics: PRODUCTS_CREATE)"));
        assert!(query.contains("__typename"));
        assert!(query.contains("... on WebhookPubSubEndpoint"));
    }

    #[test]
    fn test_create_mutation_uses_topic() {
        let mutation = subscription_mutation(
            &WebhookTopic::new("PRODUCTS_CREATE"),
            DeliveryMethod::Http,
            "https://test_host_name/webhooks",
            None,
        );
        assert!(mutation.contains(
            r#"webhookSubscriptionCreate(topic: PRODUCTS_CREATE, webhookSubscription: {callbackUrl: "https://test_host_name/webhooks"})"#
        ));
        assert!(mutation.contains("userErrors"));
    }

    #[test]
    fn test_update_mutation_uses_id() {
        let mutation = subscription_mutation(
            &WebhookTopic::new("PRODUCTS_CREATE"),
            DeliveryMethod::EventBridge,
            "arn:new",
            Some("gid://shopify/WebhookSubscription/1"),
        );
        assert!(mutation.contains(
            r#"eventBridgeWebhookSubscriptionUpdate(id: "gid://shopify/WebhookSubscription/1", webhookSubscription: {arn: "arn:new"})"#
        ));
    }

    #[test]
    fn test_delete_mutation() {
        let mutation = delete_mutation("gid://shopify/WebhookSubscription/7");
        assert!(mutation
            .contains(r#"webhookSubscriptionDelete(id: "gid://shopify/WebhookSubscription/7")"#));
    }

    #[test]
    fn test_existing_subscription_reads_each_endpoint_type() {
        let body = |endpoint: Value| {
            json!({"data": {"webhookSubscriptions": {"edges": [
                {"node": {"id": "gid://1", "endpoint": endpoint}}
            ]}}})
        };

        let http = existing_subscription(&body(json!({
            "__typename": "WebhookHttpEndpoint",
            "callbackUrl": "https://app.example.com/webhooks"
        })))
        .unwrap()
        .unwrap();
        assert_eq!(http.id, "gid://1");
        assert_eq!(http.delivery_method, Some(DeliveryMethod::Http));
        assert_eq!(http.address, "https://app.example.com/webhooks");

        let bridge = existing_subscription(&body(json!({
            "__typename": "WebhookEventBridgeEndpoint",
            "arn": "arn:test"
        })))
        .unwrap()
        .unwrap();
        assert_eq!(bridge.address, "arn:test");

        let pub_sub = existing_subscription(&body(json!({
            "__typename": "WebhookPubSubEndpoint",
            "pubSubProject": "my-project-id",
            "pubSubTopic": "my-topic-id"
        })))
        .unwrap()
        .unwrap();
        assert_eq!(pub_sub.delivery_method, Some(DeliveryMethod::PubSub));
        assert_eq!(pub_sub.address, "pubsub://my-project-id:my-topic-id");
    }

    #[test]
    fn test_existing_subscription_empty_and_malformed() {
        let empty = json!({"data": {"webhookSubscriptions": {"edges": []}}});
        assert_eq!(existing_subscription(&empty).unwrap(), None);

        assert!(matches!(
            existing_subscription(&json!({"data": {}})),
            Err(WebhookError::ShopifyError { .. })
        ));
    }

    #[test]
    fn test_mutation_succeeded_requires_subscription() {
        let ok = json!({"data": {"webhookSubscriptionCreate": {
            "userErrors": [], "webhookSubscription": {"id": "gid://1"}
        }}});
        assert!(mutation_succeeded(&ok, DeliveryMethod::Http, false));
        assert!(!mutation_succeeded(&ok, DeliveryMethod::Http, true));

        let rejected = json!({"data": {"webhookSubscriptionCreate": {
            "userErrors": [{"field": ["callbackUrl"], "message": "Address is invalid"}],
            "webhookSubscription": null
        }}});
        assert!(!mutation_succeeded(&rejected, DeliveryMethod::Http, false));
        assert_eq!(
            user_errors(&rejected, "webhookSubscriptionCreate").as_deref(),
            Some("Address is invalid")
        );
        assert_eq!(user_errors(&ok, "webhookSubscriptionCreate"), None);
    }
}
