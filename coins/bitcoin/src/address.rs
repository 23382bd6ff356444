//! Payment-URI aware address parsing.

use walletkit_traits::{AdapterError, AdapterResult};

/// Validates addresses against a coin's payment-URI scheme.
///
/// The parser accepts both bare addresses and `scheme:address` payment URIs
/// (an optional `?query` tail is dropped). Whether the scheme prefix is kept
/// in the parsed result is chain-specific: Bitcoin addresses circulate
/// without it, while Bitcoin Cash cashaddr strings retain the
/// `bitcoincash:` prefix as part of the canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressParser {
    scheme: String,
    remove_scheme: bool,
}

impl AddressParser {
    /// Creates a parser for the given URI scheme.
    ///
    /// `remove_scheme` controls whether the prefix is stripped from the
    /// parsed address or retained.
    pub fn new(scheme: impl Into<String>, remove_scheme: bool) -> Self {
        Self {
            scheme: scheme.into(),
            remove_scheme,
        }
    }

    /// Returns the URI scheme this parser is configured with
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Parses an address or payment URI into its canonical address form.
    ///
    /// The part after the scheme prefix (or the whole input for a bare
    /// address) is validated against the address grammar; the canonical
    /// result keeps or drops the prefix according to the parser
    /// configuration.
    pub fn parse(&self, input: &str) -> AdapterResult<String> {
        let input = input.trim();
        // Payment URIs may carry a query tail (amount, label); it is not
        // part of the address.
        let input = input.split('?').next().unwrap_or(input);

        let prefix = format!("{}:", self.scheme);
        let (payload, canonical) = match input.strip_prefix(&prefix) {
            Some(rest) => {
                let canonical = if self.remove_scheme {
                    rest.to_string()
                } else {
                    input.to_string()
                };
                (rest, canonical)
            }
            None => (input, input.to_string()),
        };

        validate_grammar(payload).map_err(|reason| AdapterError::InvalidAddress {
            address: input.to_string(),
            reason,
        })?;
        Ok(canonical)
    }
}

/// Checks the address body against the shared Bitcoin-family grammar:
/// ASCII alphanumeric, plausible length, no base58-forbidden characters in
/// legacy addresses.
fn validate_grammar(payload: &str) -> Result<(), String> {
    if payload.is_empty() {
        return Err("empty address".to_string());
    }
    if payload.len() < 14 || payload.len() > 74 {
        return Err(format!("implausible length {}", payload.len()));
    }
    if !payload.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("unexpected character".to_string());
    }
    // Legacy base58 addresses never contain 0, O, I or l.
    if (payload.starts_with('1') || payload.starts_with('3'))
        && payload.chars().any(|c| matches!(c, '0' | 'O' | 'I' | 'l'))
    {
        return Err("character outside base58 alphabet".to_string());
    }
    Ok(())
}
