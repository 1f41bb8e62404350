use argon2::password_hash::PasswordHash;

/// A stored or incoming password.  Apart from `Hash` and `Raw`, the
/// variants are markers stored in place of a hash that describe why the
/// account cannot currently be logged into with a password.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum Password<'a> {
    Misconfigured,
    New,
    Reset,
    Restricted,
    Hash(PasswordHash<'a>),
    Raw(&'a str),
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PasswordStatus {
    Misconfigured,
    New,
    Reset,
    Restricted,
    Hash,
    Raw,
}

mod impls;
