//! AWS Signature Version 4, the scheme the speech service authenticates
//! requests with.

use std::time::SystemTime;

use aws_sigv4::http_request::{
    sign, SignableBody, SignableRequest, SigningParams, SigningSettings,
};
use aws_sigv4::sign::v4;
use tracing::instrument;

use crate::credentials::Credentials;
use crate::error::{Error, Result};

const PROVIDER_NAME: &str = "ivona-speak";

/// Where and when a request is signed.
#[derive(Debug, Clone)]
pub struct SigningScope<'a> {
    pub region: &'a str,
    pub service: &'a str,
    pub time: SystemTime,
}

/// Sign a request and return the headers to add to it (`x-amz-date` and
/// `authorization`). `headers` are the headers already on the request;
/// `host` is taken from `url`.
#[instrument(skip(credentials, headers, payload))]
pub fn sign_request(
    credentials: &Credentials,
    scope: &SigningScope<'_>,
    method: &str,
    url: &str,
    headers: &[(&str, &str)],
    payload: &[u8],
) -> Result<Vec<(String, String)>> {
    let identity = aws_credential_types::Credentials::new(
        credentials.access_key.clone(),
        credentials.secret_key.clone(),
        None,
        None,
        PROVIDER_NAME,
    )
    .into();

    let params: SigningParams<'_> = v4::SigningParams::builder()
        .identity(&identity)
        .region(scope.region)
        .name(scope.service)
        .time(scope.time)
        .settings(SigningSettings::default())
        .build()
        .map_err(|e| Error::Signing(e.to_string()))?
        .into();

    let signable = SignableRequest::new(
        method,
        url,
        headers.iter().copied(),
        SignableBody::Bytes(payload),
    )
    .map_err(|e| Error::Signing(e.to_string()))?;

    let (instructions, _signature) = sign(signable, &params)
        .map_err(|e| Error::Signing(e.to_string()))?
        .into_parts();

    Ok(instructions
        .headers()
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .collect())
}
