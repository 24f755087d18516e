//! HTTP backend for a hosted entity store
//!
//! Speaks a small REST dialect: `GET /me` for the session identity,
//! `POST /entities/{type}/filter` for equality-filtered reads, and
//! `POST`/`PATCH`/`DELETE` under `/entities/{type}` for writes.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::Result;
use crate::household::Scope;
use crate::models::{
    Category, Expense, ExpenseUpdate, Household, Membership, NewCategory, NewExpense,
    NewRecurringExpense, RecurringExpense, User,
};
use crate::store::EntityStore;

const MEMBERSHIP_TYPE: &str = "Membership";
const HOUSEHOLD_TYPE: &str = "Household";
const CATEGORY_TYPE: &str = "Category";
const EXPENSE_TYPE: &str = "Expense";
const RECURRING_TYPE: &str = "RecurringExpense";

/// Client for a hosted entity store over HTTP
#[derive(Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
    /// Sent as `X-Session-Email` when the store host does not authenticate
    session_email: Option<String>,
}

impl HttpStore {
    pub fn new(base_url: &str, session_email: Option<&str>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session_email: session_email.map(String::from),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_session(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session_email {
            Some(email) => req.header("X-Session-Email", email),
            None => req,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .with_session(self.client.get(self.url(path)))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Equality-filtered read with optional sort and limit
    async fn filter<T: DeserializeOwned>(
        &self,
        entity_type: &str,
        fields: Value,
        sort: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<T>> {
        let mut body = json!({ "fields": fields });
        if let Some(sort) = sort {
            body["sort"] = json!(sort);
        }
        if let Some(limit) = limit {
            body["limit"] = json!(limit);
        }
        debug!(entity_type, "filtering entities");
        let response = self
            .with_session(
                self.client
                    .post(self.url(&format!("/entities/{}/filter", entity_type))),
            )
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn create<T: DeserializeOwned>(&self, entity_type: &str, data: Value) -> Result<T> {
        debug!(entity_type, "creating entity");
        let response = self
            .with_session(
                self.client
                    .post(self.url(&format!("/entities/{}", entity_type))),
            )
            .json(&data)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn update<T: DeserializeOwned>(
        &self,
        entity_type: &str,
        id: &str,
        data: Value,
    ) -> Result<T> {
        debug!(entity_type, id, "updating entity");
        let response = self
            .with_session(
                self.client
                    .patch(self.url(&format!("/entities/{}/{}", entity_type, id))),
            )
            .json(&data)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn delete(&self, entity_type: &str, id: &str) -> Result<()> {
        debug!(entity_type, id, "deleting entity");
        self.with_session(
            self.client
                .delete(self.url(&format!("/entities/{}/{}", entity_type, id))),
        )
        .send()
        .await?
        .error_for_status()?;
        Ok(())
    }

    fn to_value<S: serde::Serialize>(data: &S) -> Result<Value> {
        Ok(serde_json::to_value(data)?)
    }

    fn with_creator(mut value: Value, created_by: &str) -> Value {
        value["created_by"] = json!(created_by);
        value
    }
}

#[async_trait]
impl EntityStore for HttpStore {
    async fn me(&self) -> Result<User> {
        self.get_json("/me").await
    }

    async fn list_households(&self) -> Result<Vec<Household>> {
        self.get_json(&format!("/entities/{}", HOUSEHOLD_TYPE)).await
    }

    async fn create_household(&self, name: &str, creator_email: &str) -> Result<Household> {
        self.create(
            HOUSEHOLD_TYPE,
            json!({
                "name": name,
                "member_emails": [creator_email],
                "created_by": creator_email,
            }),
        )
        .await
    }

    async fn update_household_members(
        &self,
        id: &str,
        member_emails: &[String],
    ) -> Result<Household> {
        self.update(HOUSEHOLD_TYPE, id, json!({ "member_emails": member_emails }))
            .await
    }

    async fn memberships_for(&self, email: &str) -> Result<Vec<Membership>> {
        self.filter(MEMBERSHIP_TYPE, json!({ "email": email }), None, None)
            .await
    }

    async fn create_membership(&self, email: &str, household_id: &str) -> Result<Membership> {
        self.create(
            MEMBERSHIP_TYPE,
            json!({ "email": email, "household_id": household_id }),
        )
        .await
    }

    async fn delete_membership(&self, id: &str) -> Result<()> {
        self.delete(MEMBERSHIP_TYPE, id).await
    }

    async fn filter_categories(&self, scope: &Scope) -> Result<Vec<Category>> {
        self.filter(CATEGORY_TYPE, scope.filter_fields(), None, None)
            .await
    }

    async fn create_category(&self, new: &NewCategory, created_by: &str) -> Result<Category> {
        self.create(
            CATEGORY_TYPE,
            Self::with_creator(Self::to_value(new)?, created_by),
        )
        .await
    }

    async fn update_category(&self, id: &str, new: &NewCategory) -> Result<Category> {
        self.update(CATEGORY_TYPE, id, Self::to_value(new)?).await
    }

    async fn delete_category(&self, id: &str) -> Result<()> {
        self.delete(CATEGORY_TYPE, id).await
    }

    async fn filter_expenses(&self, scope: &Scope, limit: Option<usize>) -> Result<Vec<Expense>> {
        self.filter(EXPENSE_TYPE, scope.filter_fields(), Some("-date"), limit)
            .await
    }

    async fn create_expense(&self, new: &NewExpense, created_by: &str) -> Result<Expense> {
        self.create(
            EXPENSE_TYPE,
            Self::with_creator(Self::to_value(new)?, created_by),
        )
        .await
    }

    async fn update_expense(&self, id: &str, update: &ExpenseUpdate) -> Result<Expense> {
        self.update(EXPENSE_TYPE, id, Self::to_value(update)?).await
    }

    async fn delete_expense(&self, id: &str) -> Result<()> {
        self.delete(EXPENSE_TYPE, id).await
    }

    async fn filter_recurring(&self, scope: &Scope) -> Result<Vec<RecurringExpense>> {
        self.filter(RECURRING_TYPE, scope.filter_fields(), None, None)
            .await
    }

    async fn create_recurring(
        &self,
        new: &NewRecurringExpense,
        created_by: &str,
    ) -> Result<RecurringExpense> {
        self.create(
            RECURRING_TYPE,
            Self::with_creator(Self::to_value(new)?, created_by),
        )
        .await
    }

    async fn update_recurring(
        &self,
        id: &str,
        new: &NewRecurringExpense,
    ) -> Result<RecurringExpense> {
        self.update(RECURRING_TYPE, id, Self::to_value(new)?).await
    }

    async fn delete_recurring(&self, id: &str) -> Result<()> {
        self.delete(RECURRING_TYPE, id).await
    }
}

impl std::fmt::Debug for HttpStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStore")
            .field("base_url", &self.base_url)
            .finish()
    }
}
