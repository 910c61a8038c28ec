//! This module contains a bunch of small inline modules to make it possible to
//! easily filter out individual log messages with our filter system.

use hyper::Request;
use crate::prelude::*;

pub(crate) mod req {
    use super::*;

    pub(crate) fn log<B>(req: &Request<B>) {
        trace!(
            method = ?req.method(),
            path = req.uri().path_and_query().map_or("", |pq| pq.as_str()),
            "Incoming HTTP request",
        );
    }
}

pub(crate) mod headers {
    use super::*;

    pub(crate) fn log<B>(req: &Request<B>) {
        if tracing::enabled!(tracing::Level::TRACE) {
            let out = req.headers().iter()
                .map(|(name, value)| {
                    format!("\n  {}: {}", name, String::from_utf8_lossy(value.as_bytes()))
                })
                .collect::<String>();
            trace!("HTTP Headers: {}", out);
        }
    }
}
