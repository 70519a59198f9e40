use super::schema::images;
use crate::error::Error;
use crate::store::ImageStore;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use tracing::debug;

const CREATE_IMAGES_TABLE: &str = "CREATE TABLE IF NOT EXISTS images (
    id serial PRIMARY KEY,
    name VARCHAR(255),
    data BYTEA
)";

#[derive(Debug, Insertable)]
#[diesel(table_name = images)]
pub struct NewImage<'a> {
    pub name: &'a str,
    pub data: &'a [u8],
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = images)]
pub struct ImageRow {
    pub id: i32,
    pub name: Option<String>,
    pub data: Option<Vec<u8>>,
}

/// `ImageStore` backed by a single PostgreSQL connection.
/// Every statement runs outside an explicit transaction and commits on its own.
pub struct PgImageStore {
    conn: PgConnection,
}

impl PgImageStore {
    pub fn new(conn: PgConnection) -> Self {
        Self { conn }
    }

    pub fn connect(database_url: &str) -> Result<Self, Error> {
        let conn = super::establish_connection(database_url)?;
        Ok(Self::new(conn))
    }

    pub fn connection(&mut self) -> &mut PgConnection {
        &mut self.conn
    }

    pub fn count(&mut self) -> Result<i64, Error> {
        let count = images::table.count().get_result::<i64>(&mut self.conn)?;
        Ok(count)
    }

    /// Most recent rows first.
    pub fn latest(&mut self, limit: i64) -> Result<Vec<ImageRow>, Error> {
        let rows = images::table
            .select(ImageRow::as_select())
            .order(images::id.desc())
            .limit(limit)
            .load(&mut self.conn)?;
        Ok(rows)
    }

    pub fn truncate(&mut self) -> Result<(), Error> {
        debug!("Truncating table: images");
        diesel::sql_query("TRUNCATE TABLE images RESTART IDENTITY").execute(&mut self.conn)?;
        Ok(())
    }
}

impl ImageStore for PgImageStore {
    fn ensure_schema(&mut self) -> Result<(), Error> {
        diesel::sql_query(CREATE_IMAGES_TABLE).execute(&mut self.conn)?;
        debug!("Table 'images' is ready");
        Ok(())
    }

    fn insert(&mut self, name: &str, data: &[u8]) -> Result<(), Error> {
        diesel::insert_into(images::table)
            .values(NewImage { name, data })
            .execute(&mut self.conn)?;
        Ok(())
    }
}
