//! Table registry
//!
//! Every table reachable through `/rest/{table}` is declared here with its
//! column whitelist and access policy. Anything not listed does not exist
//! as far as the API is concerned.

use shared::models::{Admin, Category, ContactMessage, Product, Record, Reservation};

use crate::utils::{AppError, ErrorCode};

/// Column value type, decides how filter values are bound and rows decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Real,
    Text,
    Bool,
    ReservationStatus,
    ContactStatus,
}

impl ColumnKind {
    /// Accepts `like` / `ilike`
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::ReservationStatus | Self::ContactStatus
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnKind,
    /// Client may send it in an insert body
    pub insertable: bool,
    /// Client may send it in an update body
    pub updatable: bool,
}

const fn col(name: &'static str, kind: ColumnKind) -> ColumnDef {
    ColumnDef {
        name,
        kind,
        insertable: true,
        updatable: true,
    }
}

/// Assigned by the server, read-only for clients
const fn server_col(name: &'static str, kind: ColumnKind) -> ColumnDef {
    ColumnDef {
        name,
        kind,
        insertable: false,
        updatable: false,
    }
}

/// Written by the visitor who submitted the row, fixed afterwards
const fn submitted_col(name: &'static str, kind: ColumnKind) -> ColumnDef {
    ColumnDef {
        name,
        kind,
        insertable: true,
        updatable: false,
    }
}

/// Workflow status: server default on insert, admin-editable afterwards
const fn status_col(kind: ColumnKind) -> ColumnDef {
    ColumnDef {
        name: "status",
        kind,
        insertable: false,
        updatable: true,
    }
}

/// Who may perform an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone, signed in or not
    Public,
    /// Signed-in admins only
    Admin,
    /// Nobody through the table API
    Denied,
}

#[derive(Debug, Clone, Copy)]
pub struct AccessPolicy {
    pub select: Access,
    pub insert: Access,
    pub update: Access,
    pub delete: Access,
}

/// Table operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl AccessPolicy {
    pub fn for_operation(&self, op: Operation) -> Access {
        match op {
            Operation::Select => self.select,
            Operation::Insert => self.insert,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }
}

/// Catalog tables: public reads, admin writes
const CATALOG_POLICY: AccessPolicy = AccessPolicy {
    select: Access::Public,
    insert: Access::Admin,
    update: Access::Admin,
    delete: Access::Admin,
};

/// Visitor submissions: anyone submits, admins manage
const INBOX_POLICY: AccessPolicy = AccessPolicy {
    select: Access::Admin,
    insert: Access::Public,
    update: Access::Admin,
    delete: Access::Admin,
};

/// Accounts are created through `/api/auth/register` only
const ACCOUNT_POLICY: AccessPolicy = AccessPolicy {
    select: Access::Admin,
    insert: Access::Denied,
    update: Access::Denied,
    delete: Access::Admin,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Products,
    Categories,
    Reservations,
    ContactMessages,
    Admin,
}

#[derive(Debug)]
pub struct TableDef {
    pub name: &'static str,
    pub kind: TableKind,
    pub columns: &'static [ColumnDef],
    pub policy: AccessPolicy,
    /// Error code reported when a single-row lookup finds nothing
    pub not_found: ErrorCode,
}

use ColumnKind::*;

static PRODUCTS: TableDef = TableDef {
    name: Product::TABLE,
    kind: TableKind::Products,
    columns: &[
        server_col("id", Integer),
        col("name", Text),
        col("description", Text),
        col("price", Real),
        col("category", Text),
        col("image_url", Text),
        col("stock", Integer),
        col("is_available", Bool),
        server_col("created_at", Integer),
    ],
    policy: CATALOG_POLICY,
    not_found: ErrorCode::ProductNotFound,
};

static CATEGORIES: TableDef = TableDef {
    name: Category::TABLE,
    kind: TableKind::Categories,
    columns: &[
        server_col("id", Integer),
        col("name", Text),
        col("is_active", Bool),
        col("sort_order", Integer),
        server_col("created_at", Integer),
    ],
    policy: CATALOG_POLICY,
    not_found: ErrorCode::CategoryNotFound,
};

static RESERVATIONS: TableDef = TableDef {
    name: Reservation::TABLE,
    kind: TableKind::Reservations,
    columns: &[
        server_col("id", Integer),
        submitted_col("name", Text),
        submitted_col("email", Text),
        submitted_col("phone", Text),
        col("date", Text),
        col("time", Text),
        col("guests", Integer),
        col("special_request", Text),
        status_col(ReservationStatus),
        server_col("created_at", Integer),
    ],
    policy: INBOX_POLICY,
    not_found: ErrorCode::ReservationNotFound,
};

static CONTACT_MESSAGES: TableDef = TableDef {
    name: ContactMessage::TABLE,
    kind: TableKind::ContactMessages,
    columns: &[
        server_col("id", Integer),
        submitted_col("name", Text),
        submitted_col("email", Text),
        submitted_col("message", Text),
        status_col(ContactStatus),
        server_col("created_at", Integer),
    ],
    policy: INBOX_POLICY,
    not_found: ErrorCode::ContactMessageNotFound,
};

// password_hash is not listed, so it can be neither filtered nor returned
static ADMIN: TableDef = TableDef {
    name: Admin::TABLE,
    kind: TableKind::Admin,
    columns: &[
        server_col("id", Integer),
        server_col("full_name", Text),
        server_col("email", Text),
        server_col("username", Text),
        server_col("phone", Text),
        server_col("created_at", Integer),
    ],
    policy: ACCOUNT_POLICY,
    not_found: ErrorCode::AdminNotFound,
};

static TABLES: [&TableDef; 5] = [&PRODUCTS, &CATEGORIES, &RESERVATIONS, &CONTACT_MESSAGES, &ADMIN];

/// Every table the service exposes
pub fn all() -> impl Iterator<Item = &'static TableDef> {
    TABLES.iter().copied()
}

/// Look up a table by its wire name
pub fn lookup(name: &str) -> Result<&'static TableDef, AppError> {
    TABLES
        .iter()
        .copied()
        .find(|t| t.name == name)
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::TableNotFound, format!("Unknown table: {name}"))
                .with_detail("table", name)
        })
}

impl TableDef {
    pub fn column(&self, name: &str) -> Result<&ColumnDef, AppError> {
        self.columns.iter().find(|c| c.name == name).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ColumnNotFound,
                format!("Unknown column {}.{}", self.name, name),
            )
            .with_detail("column", name)
        })
    }

    /// Comma separated column list for SELECT / RETURNING
    pub fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Reject body keys that are unknown or not writable for `op`
    pub fn check_writable<'a>(
        &self,
        keys: impl IntoIterator<Item = &'a String>,
        op: Operation,
    ) -> Result<(), AppError> {
        for key in keys {
            let column = self.column(key)?;
            let writable = match op {
                Operation::Insert => column.insertable,
                Operation::Update => column.updatable,
                _ => false,
            };
            if !writable {
                return Err(AppError::with_message(
                    ErrorCode::ColumnNotWritable,
                    format!("Column {}.{} cannot be set on {}", self.name, key, op.as_str()),
                )
                .with_detail("column", key.as_str()));
            }
        }
        Ok(())
    }
}
