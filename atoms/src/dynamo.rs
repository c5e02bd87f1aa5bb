//! Small readers over DynamoDB items so every atom parses attributes the same way.

use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::PersistenceError;

pub type Item = HashMap<String, AttributeValue>;

pub fn string(item: &Item, key: &str) -> String {
    opt_string(item, key).unwrap_or_default()
}

pub fn opt_string(item: &Item, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
}

pub fn boolean(item: &Item, key: &str, default: bool) -> bool {
    item.get(key)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .unwrap_or(default)
}

pub fn number<T: FromStr>(item: &Item, key: &str) -> Option<T> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse().ok())
}

/// Strips the entity prefix off a sort key, e.g. `PRODUCT#abc` -> `abc`.
pub fn id_from_sk<'a>(item: &'a Item, prefix: &str) -> Option<&'a str> {
    item.get("SK")
        .and_then(|v| v.as_s().ok())
        .and_then(|sk| sk.strip_prefix(prefix))
}

pub fn s(value: impl Into<String>) -> AttributeValue {
    AttributeValue::S(value.into())
}

pub fn n(value: impl ToString) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

/// Sort key for sequenced children. Zero padded so a query returns them in display order.
pub fn sequence_sk(prefix: &str, sequence: u32) -> String {
    format!("{}{:04}", prefix, sequence)
}

/// Every item under `pk` whose sort key starts with `sk_prefix`, following pagination.
pub async fn query_prefix(
    client: &DynamoClient,
    table_name: &str,
    pk: &str,
    sk_prefix: &str,
) -> Result<Vec<Item>, PersistenceError> {
    let mut items = Vec::new();
    let mut start_key: Option<Item> = None;

    loop {
        let result = client
            .query()
            .table_name(table_name)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
            .expression_attribute_values(":pk", s(pk))
            .expression_attribute_values(":sk_prefix", s(sk_prefix))
            .set_exclusive_start_key(start_key.take())
            .send()
            .await
            .map_err(|e| PersistenceError::backend("query", e))?;

        items.extend(result.items().iter().cloned());

        match result.last_evaluated_key() {
            Some(key) if !key.is_empty() => start_key = Some(key.clone()),
            _ => break,
        }
    }

    Ok(items)
}

pub async fn get(
    client: &DynamoClient,
    table_name: &str,
    pk: &str,
    sk: &str,
) -> Result<Option<Item>, PersistenceError> {
    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", s(pk))
        .key("SK", s(sk))
        .send()
        .await
        .map_err(|e| PersistenceError::backend("get_item", e))?;

    Ok(result.item().cloned())
}

pub async fn delete(
    client: &DynamoClient,
    table_name: &str,
    pk: &str,
    sk: &str,
) -> Result<(), PersistenceError> {
    client
        .delete_item()
        .table_name(table_name)
        .key("PK", s(pk))
        .key("SK", s(sk))
        .send()
        .await
        .map_err(|e| PersistenceError::backend("delete_item", e))?;
    Ok(())
}

/// Deletes every item under `pk` whose sort key starts with `sk_prefix`.
pub async fn delete_prefix(
    client: &DynamoClient,
    table_name: &str,
    pk: &str,
    sk_prefix: &str,
) -> Result<usize, PersistenceError> {
    let items = query_prefix(client, table_name, pk, sk_prefix).await?;
    let mut deleted = 0;
    for item in &items {
        if let Some(sk) = item.get("SK").and_then(|v| v.as_s().ok()) {
            delete(client, table_name, pk, sk).await?;
            deleted += 1;
        }
    }
    Ok(deleted)
}

/// Collects `SET` clauses for an `update_item` call, the way each atom's update handler
/// builds its expression attribute names and values.
#[derive(Debug, Default)]
pub struct UpdateSet {
    clauses: Vec<String>,
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl UpdateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, attribute: &str, value: AttributeValue) -> &mut Self {
        let name = format!("#{}", attribute);
        let placeholder = format!(":{}", attribute);
        self.clauses.push(format!("{} = {}", name, placeholder));
        self.names.insert(name, attribute.to_string());
        self.values.insert(placeholder, value);
        self
    }

    pub fn set_opt(&mut self, attribute: &str, value: Option<AttributeValue>) -> &mut Self {
        if let Some(value) = value {
            self.set(attribute, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn expression(&self) -> String {
        format!("SET {}", self.clauses.join(", "))
    }

    /// Applies the update to an existing item. A missing item yields `NotFound`.
    pub async fn apply(
        self,
        client: &DynamoClient,
        table_name: &str,
        pk: &str,
        sk: &str,
        entity: &'static str,
        id: &str,
    ) -> Result<(), PersistenceError> {
        if self.is_empty() {
            return Ok(());
        }

        let update_expression = self.expression();
        let mut builder = client
            .update_item()
            .table_name(table_name)
            .key("PK", s(pk))
            .key("SK", s(sk))
            .update_expression(update_expression)
            .condition_expression("attribute_exists(PK)");

        for (k, v) in self.names {
            builder = builder.expression_attribute_names(k, v);
        }
        for (k, v) in self.values {
            builder = builder.expression_attribute_values(k, v);
        }

        builder.send().await.map_err(|e| {
            let missing = e
                .as_service_error()
                .map(|se| se.is_conditional_check_failed_exception())
                .unwrap_or(false);
            if missing {
                PersistenceError::not_found(entity, id)
            } else {
                PersistenceError::backend("update_item", e)
            }
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(pairs: &[(&str, AttributeValue)]) -> Item {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn readers_fall_back_on_missing_or_mistyped_attributes() {
        let item = item(&[
            ("SK", s("PRODUCT#p1")),
            ("name", s("Kraft bag")),
            ("blank", s("")),
            ("price", n(12)),
            ("active", AttributeValue::Bool(true)),
        ]);

        assert_eq!(string(&item, "name"), "Kraft bag");
        assert_eq!(opt_string(&item, "blank"), None);
        assert_eq!(opt_string(&item, "price"), None);
        assert_eq!(number::<u32>(&item, "price"), Some(12));
        assert!(boolean(&item, "active", false));
        assert!(boolean(&item, "missing", true));
        assert_eq!(id_from_sk(&item, "PRODUCT#"), Some("p1"));
        assert_eq!(id_from_sk(&item, "IMAGE#"), None);
    }

    #[test]
    fn update_set_names_every_attribute() {
        let mut update = UpdateSet::new();
        update
            .set("name", s("Cups"))
            .set_opt("description", None)
            .set_opt("sort_order", Some(n(2)));

        assert_eq!(update.expression(), "SET #name = :name, #sort_order = :sort_order");
        assert!(UpdateSet::new().set_opt("x", None).is_empty());
    }

    #[test]
    fn sequence_keys_sort_lexically_in_display_order() {
        let mut keys = vec![sequence_sk("IMAGE#", 10), sequence_sk("IMAGE#", 2)];
        keys.sort();
        assert_eq!(keys, vec!["IMAGE#0002", "IMAGE#0010"]);
    }
}
