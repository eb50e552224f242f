//! Reconciles local webhook configuration with the platform.
//!
//! For each topic the registrar reads the current subscription, compares its
//! endpoint with the desired address and only writes when they differ:
//!
//! 1. GDPR topics are refused locally with no request sent.
//! 2. The check query fetches the first subscription for the topic.
//! 3. A matching address is a no-op (`success: true`, `result: {}`).
//! 4. No subscription means a create mutation.
//! 5. A different address means an update, or a create followed by a
//!    delete of the old subscription, per [`AddressChangeStrategy`]. A
//!    subscription on a different delivery method is always recreated.
//!
//! A delete rejected by the API after a successful create is logged and the
//! create result is kept; a transport failure on that delete is returned.
//!
//! GraphQL payload errors become `success: false` entries in the returned
//! [`RegisterReturn`]. Transport and configuration errors are returned as
//! [`WebhookError`].

use serde_json::json;

use crate::auth::Session;
use crate::clients::{GraphqlClient, GraphqlError};
use crate::config::ShopifyConfig;
use crate::webhooks::errors::WebhookError;
use crate::webhooks::queries::{
    check_query, delete_mutation, existing_subscription, mutation_succeeded,
    subscription_mutation, user_errors, RemoteSubscription,
};
use crate::webhooks::registry::WebhookRegistry;
use crate::webhooks::types::{
    AddressChangeStrategy, DeliveryMethod, RegisterParams, RegisterResult, RegisterReturn,
    WebhookTopic,
};

/// Registers webhook subscriptions for a shop.
///
/// # Example
///
/// ```rust,ignore
/// use shopify_admin::webhooks::{RegisterParams, WebhookRegistrar};
///
/// let registrar = WebhookRegistrar::new(&config);
/// let results = registrar
///     .register(&session, &RegisterParams::http("orders/create", "/webhooks"))
///     .await?;
/// assert!(results["ORDERS_CREATE"].success);
///
/// // Every topic in a registry, each with its own path and delivery method.
/// let results = registrar.register_all(&session, &registry).await?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WebhookRegistrar<'a> {
    config: &'a ShopifyConfig,
    strategy: AddressChangeStrategy,
    tries: Option<u32>,
}

impl<'a> WebhookRegistrar<'a> {
    /// Creates a registrar using the default [`AddressChangeStrategy`].
    #[must_use]
    pub fn new(config: &'a ShopifyConfig) -> Self {
        Self {
            config,
            strategy: AddressChangeStrategy::default(),
            tries: None,
        }
    }

    /// Sets how subscriptions whose address changed are replaced.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: AddressChangeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the attempt budget for each GraphQL call.
    #[must_use]
    pub const fn with_tries(mut self, tries: u32) -> Self {
        self.tries = Some(tries);
        self
    }

    /// Reconciles a single topic.
    ///
    /// The returned map has exactly one entry, keyed by the normalized topic.
    ///
    /// # Errors
    ///
    /// - [`WebhookError::HostNotConfigured`] for HTTP delivery without a host
    /// - [`WebhookError::Graphql`] for client construction or transport failures
    /// - [`WebhookError::ShopifyError`] when the check query response is malformed
    pub async fn register(
        &self,
        session: &Session,
        params: &RegisterParams,
    ) -> Result<RegisterReturn, WebhookError> {
        let mut results = RegisterReturn::new();
        let result = if params.topic.is_gdpr() {
            gdpr_refusal(&params.topic)
        } else {
            let client = GraphqlClient::new(session, self.config)?;
            self.reconcile(&client, &params.topic, params.delivery_method, &params.path)
                .await?
        };
        results.insert(params.topic.to_string(), result);
        Ok(results)
    }

    /// Reconciles every topic in `registry`, one at a time, using each
    /// entry's own path and delivery method.
    ///
    /// A topic that fails at the GraphQL level does not stop the others.
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register). The first such error stops the
    /// run.
    pub async fn register_all(
        &self,
        session: &Session,
        registry: &WebhookRegistry,
    ) -> Result<RegisterReturn, WebhookError> {
        let mut results = RegisterReturn::new();
        if registry.is_empty() {
            return Ok(results);
        }

        let client = GraphqlClient::new(session, self.config)?;
        for (topic, entry) in registry.entries() {
            let result = if topic.is_gdpr() {
                gdpr_refusal(topic)
            } else {
                self.reconcile(&client, topic, entry.delivery_method, &entry.path)
                    .await?
            };
            results.insert(topic.to_string(), result);
        }
        Ok(results)
    }

    /// Deletes the subscription for `topic`, if there is one.
    ///
    /// Returns the deleted subscription id.
    ///
    /// # Errors
    ///
    /// - [`WebhookError::Graphql`] for any client, transport or query failure
    /// - [`WebhookError::ShopifyError`] when the delete reports `userErrors`
    pub async fn unregister(
        &self,
        session: &Session,
        topic: impl Into<WebhookTopic>,
    ) -> Result<Option<String>, WebhookError> {
        let topic = topic.into();
        let client = GraphqlClient::new(session, self.config)?;
        let response = client.query(check_query(&topic), None, self.tries).await?;

        match existing_subscription(&response.body)? {
            Some(existing) => {
                self.delete(&client, &existing.id).await?;
                tracing::info!(topic = %topic, id = %existing.id, "Deleted webhook subscription");
                Ok(Some(existing.id))
            }
            None => {
                tracing::debug!(topic = %topic, "No webhook subscription to delete");
                Ok(None)
            }
        }
    }

    async fn reconcile(
        &self,
        client: &GraphqlClient,
        topic: &WebhookTopic,
        delivery_method: DeliveryMethod,
        path: &str,
    ) -> Result<RegisterResult, WebhookError> {
        let address = delivery_method.build_address(path, self.config.host())?;

        let check = match client.query(check_query(topic), None, self.tries).await {
            Ok(response) => response,
            Err(GraphqlError::Query(error)) => {
                tracing::warn!(topic = %topic, "Webhook check query returned errors");
                return Ok(RegisterResult::failed(error.response));
            }
            Err(error) => return Err(error.into()),
        };

        let Some(existing) = existing_subscription(&check.body)? else {
            return self
                .mutate(client, topic, delivery_method, &address, None)
                .await;
        };

        if existing.address == address {
            tracing::debug!(topic = %topic, %address, "Webhook subscription already up to date");
            return Ok(RegisterResult::succeeded(json!({})));
        }

        if existing.delivery_method != Some(delivery_method) {
            tracing::debug!(
                topic = %topic,
                id = %existing.id,
                "Delivery method changed, recreating subscription"
            );
            return self
                .replace(client, topic, delivery_method, &address, &existing)
                .await;
        }

        match self.strategy {
            AddressChangeStrategy::UpdateInPlace => {
                let updated = self
                    .mutate(client, topic, delivery_method, &address, Some(&existing.id))
                    .await?;
                if updated.success {
                    return Ok(updated);
                }
                tracing::debug!(
                    topic = %topic,
                    id = %existing.id,
                    "Update did not return a subscription, recreating"
                );
                self.replace(client, topic, delivery_method, &address, &existing)
                    .await
            }
            AddressChangeStrategy::Recreate => {
                self.replace(client, topic, delivery_method, &address, &existing)
                    .await
            }
        }
    }

    /// Creates the new subscription first so the topic is never left
    /// without one, then removes the old.
    async fn replace(
        &self,
        client: &GraphqlClient,
        topic: &WebhookTopic,
        delivery_method: DeliveryMethod,
        address: &str,
        existing: &RemoteSubscription,
    ) -> Result<RegisterResult, WebhookError> {
        let created = self
            .mutate(client, topic, delivery_method, address, None)
            .await?;
        if !created.success {
            return Ok(created);
        }

        match self.delete(client, &existing.id).await {
            Ok(()) => {
                tracing::info!(topic = %topic, id = %existing.id, "Deleted webhook subscription");
            }
            Err(
                error @ (WebhookError::ShopifyError { .. }
                | WebhookError::Graphql(GraphqlError::Query(_))),
            ) => {
                tracing::warn!(
                    topic = %topic,
                    id = %existing.id,
                    error = %error,
                    "Failed to delete replaced webhook subscription"
                );
            }
            Err(error) => return Err(error),
        }
        Ok(created)
    }

    async fn mutate(
        &self,
        client: &GraphqlClient,
        topic: &WebhookTopic,
        delivery_method: DeliveryMethod,
        address: &str,
        id: Option<&str>,
    ) -> Result<RegisterResult, WebhookError> {
        let mutation = subscription_mutation(topic, delivery_method, address, id);
        let body = match client.query(mutation, None, self.tries).await {
            Ok(response) => response.body,
            Err(GraphqlError::Query(error)) => return Ok(RegisterResult::failed(error.response)),
            Err(error) => return Err(error.into()),
        };

        let update = id.is_some();
        if mutation_succeeded(&body, delivery_method, update) {
            tracing::info!(
                topic = %topic,
                %address,
                action = if update { "update" } else { "create" },
                "Registered webhook subscription"
            );
            Ok(RegisterResult::succeeded(body))
        } else {
            let name = delivery_method.mutation_name(update);
            tracing::warn!(
                topic = %topic,
                user_errors = %user_errors(&body, name).unwrap_or_default(),
                "Webhook subscription mutation was rejected"
            );
            Ok(RegisterResult::failed(body))
        }
    }

    async fn delete(&self, client: &GraphqlClient, id: &str) -> Result<(), WebhookError> {
        let response = client.query(delete_mutation(id), None, self.tries).await?;
        match user_errors(&response.body, "webhookSubscriptionDelete") {
            Some(message) => Err(WebhookError::ShopifyError { message }),
            None => Ok(()),
        }
    }
}

fn gdpr_refusal(topic: &WebhookTopic) -> RegisterResult {
    let message = format!(
        "GDPR topic '{topic}' cannot be registered here. Please set the appropriate webhook \
         endpoint in the 'GDPR mandatory webhooks' section of 'App setup' in the Partners Dashboard"
    );
    tracing::warn!(topic = %topic, "Refusing to register GDPR webhook topic");
    RegisterResult::failed(json!({ "errors": [{ "message": message }] }))
}
