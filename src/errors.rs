use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkVaultError {
    /// A live record for the same original URL already exists. Expected
    /// outcome of the guarded-insert path, not an operational failure:
    /// the dedup engine catches it and substitutes the stored record.
    AlreadyExists(String),
    /// Resolution hit a soft-deleted record.
    Deleted(String),
    /// No record was ever created for the short code.
    NotFound(String),
    /// Liveness/connectivity failure of the backing store.
    BackendUnavailable(String),
    /// Durable-log append or transaction failure during create.
    WriteFailure(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Serialization(String),
    StoragePluginNotFound(String),
    Validation(String),
}

impl LinkVaultError {
    /// Stable error code, used by transports and log scrapers.
    pub fn code(&self) -> &'static str {
        match self {
            LinkVaultError::AlreadyExists(_) => "E001",
            LinkVaultError::Deleted(_) => "E002",
            LinkVaultError::NotFound(_) => "E003",
            LinkVaultError::BackendUnavailable(_) => "E004",
            LinkVaultError::WriteFailure(_) => "E005",
            LinkVaultError::DatabaseConfig(_) => "E006",
            LinkVaultError::DatabaseConnection(_) => "E007",
            LinkVaultError::DatabaseOperation(_) => "E008",
            LinkVaultError::Serialization(_) => "E009",
            LinkVaultError::StoragePluginNotFound(_) => "E010",
            LinkVaultError::Validation(_) => "E011",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            LinkVaultError::AlreadyExists(_) => "Link Already Exists",
            LinkVaultError::Deleted(_) => "Link Deleted",
            LinkVaultError::NotFound(_) => "Link Not Found",
            LinkVaultError::BackendUnavailable(_) => "Backend Unavailable",
            LinkVaultError::WriteFailure(_) => "Write Failure",
            LinkVaultError::DatabaseConfig(_) => "Database Configuration Error",
            LinkVaultError::DatabaseConnection(_) => "Database Connection Error",
            LinkVaultError::DatabaseOperation(_) => "Database Operation Error",
            LinkVaultError::Serialization(_) => "Serialization Error",
            LinkVaultError::StoragePluginNotFound(_) => "Storage Plugin Not Found",
            LinkVaultError::Validation(_) => "Validation Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            LinkVaultError::AlreadyExists(msg)
            | LinkVaultError::Deleted(msg)
            | LinkVaultError::NotFound(msg)
            | LinkVaultError::BackendUnavailable(msg)
            | LinkVaultError::WriteFailure(msg)
            | LinkVaultError::DatabaseConfig(msg)
            | LinkVaultError::DatabaseConnection(msg)
            | LinkVaultError::DatabaseOperation(msg)
            | LinkVaultError::Serialization(msg)
            | LinkVaultError::StoragePluginNotFound(msg)
            | LinkVaultError::Validation(msg) => msg,
        }
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkVaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkVaultError {}

impl LinkVaultError {
    pub fn already_exists<T: Into<String>>(msg: T) -> Self {
        LinkVaultError::AlreadyExists(msg.into())
    }

    pub fn deleted<T: Into<String>>(msg: T) -> Self {
        LinkVaultError::Deleted(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkVaultError::NotFound(msg.into())
    }

    pub fn backend_unavailable<T: Into<String>>(msg: T) -> Self {
        LinkVaultError::BackendUnavailable(msg.into())
    }

    pub fn write_failure<T: Into<String>>(msg: T) -> Self {
        LinkVaultError::WriteFailure(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LinkVaultError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinkVaultError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkVaultError::DatabaseOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkVaultError::Serialization(msg.into())
    }

    pub fn storage_plugin_not_found<T: Into<String>>(msg: T) -> Self {
        LinkVaultError::StoragePluginNotFound(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkVaultError::Validation(msg.into())
    }
}

impl From<sea_orm::DbErr> for LinkVaultError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinkVaultError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LinkVaultError {
    fn from(err: std::io::Error) -> Self {
        LinkVaultError::WriteFailure(err.to_string())
    }
}

impl From<serde_json::Error> for LinkVaultError {
    fn from(err: serde_json::Error) -> Self {
        LinkVaultError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkVaultError>;
