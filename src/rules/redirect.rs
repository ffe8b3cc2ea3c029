//! Rules for the redirect headers returned alongside a registration.

use crate::context::Context;
use crate::enums::RedirectBehavior;
use crate::primitives::{encode_uri_component, exceeds, parse_url};
use crate::state::{Check, ValidationState};
use serde_json::{Value, json};

pub const LOCATION_KEY: &str = "location";
pub const REDIRECT_KEY: &str = "attribution-reporting-redirect";
pub const REDIRECT_CONFIG_KEY: &str = "attribution-reporting-redirect-config";

const WELL_KNOWN_CONFIG: &str = "redirect-302-to-well-known";
const WELL_KNOWN_PATH: &str = ".well-known/attribution-reporting/register-redirect";
const WELL_KNOWN_QUERY_PARAM: &str = "302_url";

fn target(uri: &str, behavior: RedirectBehavior) -> Value {
    json!({ "uri": uri, "redirect_behavior": behavior.as_str() })
}

pub fn redirect_config(_state: &mut ValidationState, ctx: &mut Context, value: &str) -> Check {
    ctx.set(REDIRECT_CONFIG_KEY, value);
    Ok(())
}

/// Entries beyond `max_registration_redirects` are dropped with a warning
/// and never validated.
pub fn reporting_redirects(
    state: &mut ValidationState,
    ctx: &mut Context,
    redirects: &[Value],
) -> Check {
    let max = ctx.flags.max_registration_redirects;
    if exceeds(redirects.len(), max) {
        state.warning(format!(
            "max allowed reporting redirects: {}, all other reporting redirects will be ignored",
            max
        ));
    }

    let kept = usize::try_from(max).unwrap_or(usize::MAX);
    let mut canonical = Vec::new();
    for redirect in redirects.iter().take(kept) {
        let Value::String(uri) = redirect else {
            return Err("must be an array of strings".to_string());
        };
        parse_url(uri)?;
        canonical.push(target(uri, RedirectBehavior::AsIs));
    }
    ctx.set(REDIRECT_KEY, Value::Array(canonical));
    Ok(())
}

/// Reads the redirect config, so it must run after [`redirect_config`].
pub fn location(_state: &mut ValidationState, ctx: &mut Context, value: &str) -> Check {
    let url = parse_url(value)?;
    let to_well_known = ctx
        .expected_str(REDIRECT_CONFIG_KEY)
        .is_some_and(|config| config.to_lowercase() == WELL_KNOWN_CONFIG);

    let location = if to_well_known {
        target(&well_known_url(value), RedirectBehavior::LocationToWellKnown)
    } else {
        target(url.as_str(), RedirectBehavior::AsIs)
    };
    ctx.set(LOCATION_KEY, Value::Array(vec![location]));
    Ok(())
}

/// `<url>/.well-known/attribution-reporting/register-redirect?302_url=<url>`
/// with the original URL percent-encoded in the query.
pub fn well_known_url(url: &str) -> String {
    format!(
        "{}/{}?{}={}",
        url,
        WELL_KNOWN_PATH,
        WELL_KNOWN_QUERY_PARAM,
        encode_uri_component(url)
    )
}
