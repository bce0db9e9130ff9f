mod db;

pub use self::db::{Connection, Database, Pool, setup_db};
