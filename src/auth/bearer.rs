use super::AuthError;

/// Pull the bearer token out of an `Authorization` credential.
///
/// The credential is split on whitespace. The scheme is checked before the
/// part count, so `"Basic"` is a bad scheme rather than a missing token.
pub fn bearer_token(credential: Option<&str>) -> Result<&str, AuthError> {
    let credential = credential.ok_or(AuthError::MissingHeader)?;
    let parts: Vec<&str> = credential.split_whitespace().collect();

    let scheme = parts.first().ok_or(AuthError::MissingHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedScheme);
    }

    match parts.as_slice() {
        [_, token] => Ok(*token),
        [_] => Err(AuthError::MissingToken),
        _ => Err(AuthError::TooManyParts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_second_part_verbatim() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(bearer_token(Some("bEaReR  tok=en ")), Ok("tok=en"));
    }

    #[test]
    fn missing_or_blank_credential() {
        assert_eq!(bearer_token(None), Err(AuthError::MissingHeader));
        assert_eq!(bearer_token(Some("")), Err(AuthError::MissingHeader));
        assert_eq!(bearer_token(Some("   ")), Err(AuthError::MissingHeader));
    }

    #[test]
    fn wrong_scheme_wins_over_part_count() {
        assert_eq!(bearer_token(Some("Basic abc")), Err(AuthError::MalformedScheme));
        assert_eq!(bearer_token(Some("Basic")), Err(AuthError::MalformedScheme));
        assert_eq!(bearer_token(Some("Token a b")), Err(AuthError::MalformedScheme));
        assert_eq!(bearer_token(Some("Bearerabc")), Err(AuthError::MalformedScheme));
    }

    #[test]
    fn scheme_without_token() {
        assert_eq!(bearer_token(Some("Bearer")), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(Some("bearer   ")), Err(AuthError::MissingToken));
    }

    #[test]
    fn more_than_two_parts() {
        assert_eq!(bearer_token(Some("Bearer a b")), Err(AuthError::TooManyParts));
        assert_eq!(bearer_token(Some("Bearer a b c")), Err(AuthError::TooManyParts));
    }
}
