use crate::models::{Role, User};
use mongodb::{
    bson::doc, options::IndexOptions, Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

pub const USERS_COLLECTION: &str = "users";
pub const ROLES_COLLECTION: &str = "roles";

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for directory-service");

        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(
                IndexOptions::builder()
                    .name("username_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.users()
            .create_index(username_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create username index on users collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created unique index on users.username");

        let role_name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .name("name_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.roles()
            .create_index(role_name_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create name index on roles collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created unique index on roles.name");

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection(USERS_COLLECTION)
    }

    pub fn roles(&self) -> Collection<Role> {
        self.db.collection(ROLES_COLLECTION)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
