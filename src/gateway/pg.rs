use chrono::NaiveDate;
use postgres::types::{ToSql, Type};
use postgres::{Client, NoTls, Row};

use super::{Gateway, ResultSet};
use crate::config::AppConfig;
use crate::core::{HotelError, SqlValue};

/// Gateway backed by a blocking PostgreSQL connection.
///
/// Constructed once at startup and moved into the session; `close`
/// consumes the gateway, so the connection cannot be released twice.
pub struct PgGateway {
    client: Client,
}

impl PgGateway {
    pub fn connect(config: &AppConfig) -> Result<Self, HotelError> {
        let mut pg = postgres::Config::new();
        pg.host(&config.host)
            .port(config.port)
            .dbname(&config.dbname)
            .user(&config.user);
        if !config.password.is_empty() {
            pg.password(&config.password);
        }

        let client = pg
            .connect(NoTls)
            .map_err(|err| HotelError::Connect(err.to_string()))?;
        log::info!(
            "connected to {}:{} (database {}, user {})",
            config.host,
            config.port,
            config.dbname,
            config.user
        );
        Ok(Self { client })
    }

    pub fn close(self) -> Result<(), HotelError> {
        self.client.close()?;
        log::info!("database connection closed");
        Ok(())
    }
}

impl Gateway for PgGateway {
    fn execute_update(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, HotelError> {
        let bound = bind(params);
        Ok(self.client.execute(sql, &bound)?)
    }

    fn execute_query(&mut self, sql: &str, params: &[SqlValue]) -> Result<ResultSet, HotelError> {
        // Prepare first so the header is available even for empty results.
        let statement = self.client.prepare(sql)?;
        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let bound = bind(params);
        let rows = self.client.query(&statement, &bound)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut cells = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                cells.push(cell_to_string(row, idx)?);
            }
            out.push(cells);
        }
        Ok(ResultSet::new(columns, out))
    }
}

fn bind(params: &[SqlValue]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

/// Stringifies one cell by its declared column type (the JDBC `getString`
/// role). NULL renders as `null`.
fn cell_to_string(row: &Row, idx: usize) -> Result<String, HotelError> {
    let ty = row.columns()[idx].type_();
    let rendered = if *ty == Type::BOOL {
        row.try_get::<_, Option<bool>>(idx)?.map(|v| v.to_string())
    } else if *ty == Type::INT2 {
        row.try_get::<_, Option<i16>>(idx)?.map(|v| v.to_string())
    } else if *ty == Type::INT4 {
        row.try_get::<_, Option<i32>>(idx)?.map(|v| v.to_string())
    } else if *ty == Type::INT8 {
        row.try_get::<_, Option<i64>>(idx)?.map(|v| v.to_string())
    } else if *ty == Type::FLOAT4 {
        row.try_get::<_, Option<f32>>(idx)?.map(|v| v.to_string())
    } else if *ty == Type::FLOAT8 {
        row.try_get::<_, Option<f64>>(idx)?.map(|v| v.to_string())
    } else if *ty == Type::DATE {
        row.try_get::<_, Option<NaiveDate>>(idx)?
            .map(|v| v.format("%Y-%m-%d").to_string())
    } else if *ty == Type::TEXT || *ty == Type::VARCHAR || *ty == Type::BPCHAR || *ty == Type::NAME
    {
        row.try_get::<_, Option<String>>(idx)?
    } else {
        return Err(HotelError::Sql(format!(
            "unsupported column type '{ty}' in column {idx}"
        )));
    };
    Ok(rendered.unwrap_or_else(|| "null".to_string()))
}
