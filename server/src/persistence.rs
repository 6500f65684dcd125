//! MongoDB persistence layer holding the puzzle-configuration schema
//!
//! The store is dormant: no session or player route reads or writes it, and
//! request handling never waits on the database. The connector runs as a
//! detached task so a missing or unreachable database only degrades
//! persistence, never the in-memory core.

use log::{error, info};
use mongodb::bson::doc;
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

use crate::http::SharedState;

const DEFAULT_DATABASE: &str = "jigsaw";
pub const PUZZLES_COLLECTION: &str = "puzzles";

fn default_dimension() -> u32 {
    2
}

/// Stored puzzle configuration: the image to cut and the grid to cut it
/// into. Rows and columns default to 2.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PuzzleDoc {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(default = "default_dimension")]
    pub rows: u32,
    #[serde(default = "default_dimension")]
    pub cols: u32,
}

/// Handle to the connected database.
#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Connects with the given URI and verifies the connection with a ping.
    /// Falls back to the `jigsaw` database when the URI names none.
    pub async fn connect(uri: &str) -> Result<Self, mongodb::error::Error> {
        let client = Client::with_uri_str(uri).await?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));
        database.run_command(doc! {"ping": 1}).await?;

        Ok(Self { database })
    }

    /// Puzzle configuration collection.
    #[allow(dead_code)]
    pub fn puzzles(&self) -> Collection<PuzzleDoc> {
        self.database.collection(PUZZLES_COLLECTION)
    }
}

/// Spawns the background task that connects to MongoDB and installs the
/// store into the shared state on success. A failed connection is logged
/// and leaves the service degraded.
pub fn spawn_connector(state: SharedState, uri: String) {
    tokio::spawn(async move {
        match MongoStore::connect(&uri).await {
            Ok(store) => {
                info!("Connected to MongoDB");
                state.install_mongo(store).await;
            }
            Err(e) => error!("MongoDB connection error: {}", e),
        }
    });
}
