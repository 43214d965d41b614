//! Table-scoped data client.
//!
//! Every read and write in the storefront and admin goes through the same
//! small builder: pick a [`Table`], then `select`/`insert`/`update`/`delete`
//! with `eq`/`neq`/`search` filters, ordering and a limit.
//!
//! Table and column names are `&'static str` and are written into the SQL
//! as-is. Values are always bound as parameters.
//!
//! ```rust,ignore
//! use velora_core::table::{Order, Table};
//!
//! const FAQS: Table = Table::new("faqs");
//!
//! let faqs: Vec<Faq> = FAQS
//!     .select("*")
//!     .eq("is_active", true)
//!     .order("display_order", Order::Asc)
//!     .fetch_all(&pool)
//!     .await?;
//!
//! FAQS.update()
//!     .set("is_active", false)
//!     .set_now("updated_at")
//!     .eq("id", faq_id)
//!     .execute(&pool)
//!     .await?;
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{Executor, FromRow, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::types::{
    CartItemId, CategoryId, CouponId, DiscountType, FaqId, HelpArticleId, HeroImageId, LogLevel,
    OrderId, OrderItemId, OrderStatus, Price, ProductId, ShopperId, SystemLogId, TestimonialId,
    WishlistItemId,
};

/// A bindable column value. `None` binds a typed SQL `NULL`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(Option<bool>),
    Int(Option<i32>),
    BigInt(Option<i64>),
    Text(Option<String>),
    Uuid(Option<Uuid>),
    Decimal(Option<Decimal>),
    Timestamp(Option<DateTime<Utc>>),
    Date(Option<NaiveDate>),
    Json(Option<serde_json::Value>),
}

macro_rules! value_from {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Self::$variant(Some(v))
            }
        }

        impl From<Option<$ty>> for Value {
            fn from(v: Option<$ty>) -> Self {
                Self::$variant(v)
            }
        }
    };
}

value_from!(Bool, bool);
value_from!(Int, i32);
value_from!(BigInt, i64);
value_from!(Text, String);
value_from!(Uuid, Uuid);
value_from!(Decimal, Decimal);
value_from!(Timestamp, DateTime<Utc>);
value_from!(Date, NaiveDate);
value_from!(Json, serde_json::Value);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(Some(v.to_owned()))
    }
}

impl From<Option<&str>> for Value {
    fn from(v: Option<&str>) -> Self {
        Self::Text(v.map(str::to_owned))
    }
}

impl From<Price> for Value {
    fn from(v: Price) -> Self {
        Self::Decimal(Some(v.amount()))
    }
}

macro_rules! value_from_id {
    ($($id:ty),+ $(,)?) => {
        $(
            impl From<$id> for Value {
                fn from(v: $id) -> Self {
                    Self::Uuid(Some(v.as_uuid()))
                }
            }
        )+
    };
}

value_from_id!(
    CategoryId,
    ProductId,
    ShopperId,
    CartItemId,
    WishlistItemId,
    OrderId,
    OrderItemId,
    CouponId,
    FaqId,
    HelpArticleId,
    TestimonialId,
    HeroImageId,
    SystemLogId,
);

macro_rules! value_from_text_enum {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::Text(Some(v.as_str().to_owned()))
                }
            }
        )+
    };
}

value_from_text_enum!(OrderStatus, DiscountType, LogLevel);

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: Value) {
    match value {
        Value::Bool(v) => builder.push_bind(v),
        Value::Int(v) => builder.push_bind(v),
        Value::BigInt(v) => builder.push_bind(v),
        Value::Text(v) => builder.push_bind(v),
        Value::Uuid(v) => builder.push_bind(v),
        Value::Decimal(v) => builder.push_bind(v),
        Value::Timestamp(v) => builder.push_bind(v),
        Value::Date(v) => builder.push_bind(v),
        Value::Json(v) => builder.push_bind(v),
    };
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    const fn sql(self) -> &'static str {
        match self {
            Self::Asc => " ASC",
            Self::Desc => " DESC",
        }
    }
}

#[derive(Debug, Clone)]
enum Filter {
    Eq(&'static str, Value),
    Neq(&'static str, Value),
    Search(&'static [&'static str], String),
}

/// Escape `LIKE` wildcards and wrap in `%...%`.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &[Filter]) {
    for (i, filter) in filters.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        match filter {
            Filter::Eq(column, value) => {
                builder.push(*column).push(" = ");
                push_value(builder, value.clone());
            }
            Filter::Neq(column, value) => {
                builder.push(*column).push(" IS DISTINCT FROM ");
                push_value(builder, value.clone());
            }
            Filter::Search(columns, term) => {
                let pattern = like_pattern(term);
                builder.push("(");
                for (j, column) in columns.iter().enumerate() {
                    if j > 0 {
                        builder.push(" OR ");
                    }
                    builder.push(*column).push(" ILIKE ");
                    builder.push_bind(pattern.clone());
                }
                builder.push(")");
            }
        }
    }
}

/// Filter methods shared by the filtered builders.
macro_rules! filter_methods {
    () => {
        /// Keep rows where `column = value`.
        #[must_use]
        pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
            self.filters.push(Filter::Eq(column, value.into()));
            self
        }

        /// Keep rows where `column` is distinct from `value`.
        #[must_use]
        pub fn neq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
            self.filters.push(Filter::Neq(column, value.into()));
            self
        }

        /// Keep rows where any of `columns` contains `term`, case-insensitively.
        /// A blank term adds no filter.
        #[must_use]
        pub fn search(mut self, columns: &'static [&'static str], term: &str) -> Self {
            let term = term.trim();
            if !term.is_empty() && !columns.is_empty() {
                self.filters.push(Filter::Search(columns, term.to_owned()));
            }
            self
        }
    };
}

/// A database table addressed by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    name: &'static str,
}

impl Table {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Start a `SELECT <columns> FROM <table>`.
    #[must_use]
    pub const fn select(&self, columns: &'static str) -> Select {
        Select {
            table: self.name,
            columns,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    /// Start an `INSERT INTO <table>`.
    #[must_use]
    pub const fn insert(&self) -> Insert {
        Insert {
            table: self.name,
            values: Vec::new(),
            returning: None,
        }
    }

    /// Start an `UPDATE <table>`. Refuses to run without a filter.
    #[must_use]
    pub const fn update(&self) -> Update {
        Update {
            table: self.name,
            assignments: Vec::new(),
            filters: Vec::new(),
            returning: None,
        }
    }

    /// Start a `DELETE FROM <table>`. Refuses to run without a filter unless
    /// [`Delete::all`] is called.
    #[must_use]
    pub const fn delete(&self) -> Delete {
        Delete {
            table: self.name,
            filters: Vec::new(),
            all: false,
        }
    }
}

/// `SELECT` builder.
#[derive(Debug, Clone)]
pub struct Select {
    table: &'static str,
    columns: &'static str,
    filters: Vec<Filter>,
    order: Vec<(&'static str, Order)>,
    limit: Option<i64>,
}

impl Select {
    filter_methods!();

    /// Append an `ORDER BY` term. Later calls break ties of earlier ones.
    #[must_use]
    pub fn order(mut self, column: &'static str, direction: Order) -> Self {
        self.order.push((column, direction));
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    fn build(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT ");
        builder.push(self.columns).push(" FROM ").push(self.table);
        push_filters(&mut builder, &self.filters);
        for (i, (column, direction)) in self.order.iter().enumerate() {
            builder.push(if i == 0 { " ORDER BY " } else { ", " });
            builder.push(*column).push(direction.sql());
        }
        if let Some(limit) = self.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }
        builder
    }

    /// The SQL this builder would run, with `$n` placeholders.
    #[must_use]
    pub fn sql(&self) -> String {
        self.build().sql().to_owned()
    }

    /// Fetch every matching row.
    ///
    /// # Errors
    ///
    /// Returns the database error if the query fails or a row cannot be decoded.
    pub async fn fetch_all<'c, T, E>(&self, executor: E) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
        E: Executor<'c, Database = Postgres>,
    {
        let mut builder = self.build();
        builder.build_query_as::<T>().fetch_all(executor).await
    }

    /// Fetch the first matching row, if any.
    ///
    /// # Errors
    ///
    /// Returns the database error if the query fails or the row cannot be decoded.
    pub async fn fetch_optional<'c, T, E>(&self, executor: E) -> Result<Option<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
        E: Executor<'c, Database = Postgres>,
    {
        let mut builder = self.build();
        builder.build_query_as::<T>().fetch_optional(executor).await
    }

    /// Count matching rows. Ordering and limit are ignored.
    ///
    /// # Errors
    ///
    /// Returns the database error if the query fails.
    pub async fn count<'c, E>(&self, executor: E) -> Result<i64, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM ");
        builder.push(self.table);
        push_filters(&mut builder, &self.filters);
        builder.build_query_scalar::<i64>().fetch_one(executor).await
    }
}

/// `INSERT` builder.
#[derive(Debug, Clone)]
pub struct Insert {
    table: &'static str,
    values: Vec<(&'static str, Value)>,
    returning: Option<&'static str>,
}

impl Insert {
    /// Set a column value on the new row.
    #[must_use]
    pub fn set(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.values.push((column, value.into()));
        self
    }

    /// Add a `RETURNING` clause.
    #[must_use]
    pub const fn returning(mut self, columns: &'static str) -> Self {
        self.returning = Some(columns);
        self
    }

    fn build(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("INSERT INTO ");
        builder.push(self.table);
        if self.values.is_empty() {
            builder.push(" DEFAULT VALUES");
        } else {
            builder.push(" (");
            for (i, (column, _)) in self.values.iter().enumerate() {
                if i > 0 {
                    builder.push(", ");
                }
                builder.push(*column);
            }
            builder.push(") VALUES (");
            for (i, (_, value)) in self.values.iter().enumerate() {
                if i > 0 {
                    builder.push(", ");
                }
                push_value(&mut builder, value.clone());
            }
            builder.push(")");
        }
        if let Some(returning) = self.returning {
            builder.push(" RETURNING ").push(returning);
        }
        builder
    }

    #[must_use]
    pub fn sql(&self) -> String {
        self.build().sql().to_owned()
    }

    /// Run the insert, returning the affected row count.
    ///
    /// # Errors
    ///
    /// Returns the database error, including constraint violations.
    pub async fn execute<'c, E>(&self, executor: E) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        let mut builder = self.build();
        let result = builder.build().execute(executor).await?;
        Ok(result.rows_affected())
    }

    /// Run the insert and decode the `RETURNING` row.
    ///
    /// # Errors
    ///
    /// Returns the database error, including constraint violations.
    pub async fn fetch_one<'c, T, E>(&self, executor: E) -> Result<T, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
        E: Executor<'c, Database = Postgres>,
    {
        let mut builder = self.build();
        builder.build_query_as::<T>().fetch_one(executor).await
    }
}

#[derive(Debug, Clone)]
enum Assignment {
    Value(&'static str, Value),
    Increment(&'static str, i32),
    Toggle(&'static str),
    Now(&'static str),
}

/// `UPDATE` builder.
#[derive(Debug, Clone)]
pub struct Update {
    table: &'static str,
    assignments: Vec<Assignment>,
    filters: Vec<Filter>,
    returning: Option<&'static str>,
}

impl Update {
    filter_methods!();

    /// `column = value`
    #[must_use]
    pub fn set(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.assignments.push(Assignment::Value(column, value.into()));
        self
    }

    /// `column = column + by`
    #[must_use]
    pub fn increment(mut self, column: &'static str, by: i32) -> Self {
        self.assignments.push(Assignment::Increment(column, by));
        self
    }

    /// `column = NOT column`
    #[must_use]
    pub fn toggle(mut self, column: &'static str) -> Self {
        self.assignments.push(Assignment::Toggle(column));
        self
    }

    /// `column = now()`
    #[must_use]
    pub fn set_now(mut self, column: &'static str) -> Self {
        self.assignments.push(Assignment::Now(column));
        self
    }

    #[must_use]
    pub const fn returning(mut self, columns: &'static str) -> Self {
        self.returning = Some(columns);
        self
    }

    fn build(&self) -> Result<QueryBuilder<'static, Postgres>, sqlx::Error> {
        if self.filters.is_empty() {
            return Err(sqlx::Error::Protocol(format!(
                "refusing to update every row of {}",
                self.table
            )));
        }
        if self.assignments.is_empty() {
            return Err(sqlx::Error::Protocol(format!(
                "update of {} sets no columns",
                self.table
            )));
        }

        let mut builder = QueryBuilder::new("UPDATE ");
        builder.push(self.table).push(" SET ");
        for (i, assignment) in self.assignments.iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            match assignment {
                Assignment::Value(column, value) => {
                    builder.push(*column).push(" = ");
                    push_value(&mut builder, value.clone());
                }
                Assignment::Increment(column, by) => {
                    builder.push(*column).push(" = ").push(*column).push(" + ");
                    builder.push_bind(*by);
                }
                Assignment::Toggle(column) => {
                    builder.push(*column).push(" = NOT ").push(*column);
                }
                Assignment::Now(column) => {
                    builder.push(*column).push(" = now()");
                }
            }
        }
        push_filters(&mut builder, &self.filters);
        if let Some(returning) = self.returning {
            builder.push(" RETURNING ").push(returning);
        }
        Ok(builder)
    }

    /// The SQL this builder would run.
    ///
    /// # Errors
    ///
    /// Returns an error if the update has no filter or no assignments.
    pub fn sql(&self) -> Result<String, sqlx::Error> {
        self.build().map(|builder| builder.sql().to_owned())
    }

    /// Run the update, returning the affected row count.
    ///
    /// # Errors
    ///
    /// Returns an error if the update has no filter or no assignments, or
    /// the database rejects it.
    pub async fn execute<'c, E>(&self, executor: E) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        let mut builder = self.build()?;
        let result = builder.build().execute(executor).await?;
        Ok(result.rows_affected())
    }

    /// Run the update and decode the `RETURNING` row, if one matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the update has no filter or no assignments, or
    /// the database rejects it.
    pub async fn fetch_optional<'c, T, E>(&self, executor: E) -> Result<Option<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
        E: Executor<'c, Database = Postgres>,
    {
        let mut builder = self.build()?;
        builder.build_query_as::<T>().fetch_optional(executor).await
    }
}

/// `DELETE` builder.
#[derive(Debug, Clone)]
pub struct Delete {
    table: &'static str,
    filters: Vec<Filter>,
    all: bool,
}

impl Delete {
    filter_methods!();

    /// Allow deleting every row when no filter is given.
    #[must_use]
    pub const fn all(mut self) -> Self {
        self.all = true;
        self
    }

    fn build(&self) -> Result<QueryBuilder<'static, Postgres>, sqlx::Error> {
        if self.filters.is_empty() && !self.all {
            return Err(sqlx::Error::Protocol(format!(
                "refusing to delete every row of {} without .all()",
                self.table
            )));
        }
        let mut builder = QueryBuilder::new("DELETE FROM ");
        builder.push(self.table);
        push_filters(&mut builder, &self.filters);
        Ok(builder)
    }

    /// The SQL this builder would run.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete is unfiltered and not marked `all`.
    pub fn sql(&self) -> Result<String, sqlx::Error> {
        self.build().map(|builder| builder.sql().to_owned())
    }

    /// Run the delete, returning the affected row count.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete is unfiltered and not marked `all`, or
    /// the database rejects it.
    pub async fn execute<'c, E>(&self, executor: E) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        let mut builder = self.build()?;
        let result = builder.build().execute(executor).await?;
        Ok(result.rows_affected())
    }
}
