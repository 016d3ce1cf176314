use crate::Result;

use strata_core::{
    driver::{Connection, Driver},
    err,
};
use url::Url;

/// Picks a driver from the scheme of a connection URL.
#[derive(Debug)]
pub struct Connect {
    url: Url,
}

impl Connect {
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(anyhow::Error::from)?;
        Ok(Self { url })
    }
}

impl Driver for Connect {
    fn url(&self) -> String {
        self.url.to_string()
    }

    fn connect(&self) -> Result<Box<dyn Connection>> {
        match self.url.scheme() {
            "sqlite" => connect_sqlite(&self.url),
            scheme => Err(err!(
                "unsupported database; scheme={scheme}; url={}",
                self.url
            )),
        }
    }
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(url: &Url) -> Result<Box<dyn Connection>> {
    strata_driver_sqlite::Sqlite::new(url.as_str())?.connect()
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(_url: &Url) -> Result<Box<dyn Connection>> {
    Err(err!("`sqlite` feature not enabled"))
}
