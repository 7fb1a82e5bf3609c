// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Canonical forms of nameserver and domain names.

use std::fmt;
use std::slice::Iter;

use serde::Serialize;

static SCHEMES: &[&str] = &["https://", "http://"];

/// Canonicalizes a nameserver host name.
///
/// Lowercases, strips a leading `http://` or `https://`, trailing slashes and the trailing root
/// dot. The host name is not validated. The strip steps are repeated until the name does not
/// change anymore, so `normalize(normalize(x)) == normalize(x)` holds for every input.
pub fn normalize(raw: &str) -> String {
    fixpoint(raw, |name| {
        let name = strip_scheme(name).trim_end_matches('/');
        name.strip_suffix('.').unwrap_or(name).trim().to_string()
    })
}

/// Canonicalizes the domain name of a check request.
///
/// In addition to [`normalize`], every `/` is removed, so pasted URLs like
/// `https://example.co.za/` become `example.co.za`.
pub fn normalize_domain(raw: &str) -> String {
    fixpoint(raw, |name| {
        let name = strip_scheme(name).replace('/', "");
        name.strip_suffix('.').unwrap_or(&name).trim().to_string()
    })
}

fn fixpoint<F: Fn(&str) -> String>(raw: &str, step: F) -> String {
    let mut current = raw.trim().to_lowercase();
    loop {
        let next = step(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn strip_scheme(name: &str) -> &str {
    SCHEMES
        .iter()
        .find_map(|scheme| name.strip_prefix(scheme))
        .unwrap_or(name)
        .trim()
}

/// Ordered sequence of normalized nameserver names.
///
/// Input order and duplicates are preserved for display; comparisons treat the set like a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameserverSet {
    inner: Vec<String>,
}

impl NameserverSet {
    pub fn new<T: AsRef<str>, I: IntoIterator<Item = T>>(nameservers: I) -> NameserverSet {
        let inner = nameservers
            .into_iter()
            .map(|x| normalize(x.as_ref()))
            .filter(|x| !x.is_empty())
            .collect();
        NameserverSet { inner }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> Iter<String> {
        self.inner.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.inner
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.inner.clone()
    }
}

impl fmt::Display for NameserverSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.join(", "))
    }
}

impl<'a> IntoIterator for &'a NameserverSet {
    type Item = &'a String;
    type IntoIter = Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use spectral::prelude::*;

    use super::*;

    #[test]
    fn normalize_lowercases() {
        assert_that(&normalize("NS1.Example.COM")).is_equal_to("ns1.example.com".to_string());
    }

    #[test]
    fn normalize_strips_root_dot() {
        assert_that(&normalize("ns1.example.com.")).is_equal_to("ns1.example.com".to_string());
    }

    #[test]
    fn normalize_strips_scheme_and_trailing_slash() {
        assert_that(&normalize("https://ns1.example.com/")).is_equal_to("ns1.example.com".to_string());
        assert_that(&normalize("http://ns1.example.com")).is_equal_to("ns1.example.com".to_string());
    }

    #[test]
    fn normalize_trims_whitespace() {
        assert_that(&normalize("  ns1.example.com \t")).is_equal_to("ns1.example.com".to_string());
    }

    #[test]
    fn normalize_does_not_validate() {
        assert_that(&normalize("not a host name!")).is_equal_to("not a host name!".to_string());
        assert_that(&normalize("")).is_equal_to(String::new());
    }

    #[test]
    fn normalize_is_idempotent() {
        let inputs = [
            "ns1.example.com",
            "NS1.EXAMPLE.COM.",
            "ns1.example.com..",
            "ns1.example.com./",
            "https://http://ns1.example.com/",
            "HTTPS:// ns1.example.com ./ ",
            "/.",
            ".",
            "http://",
            "İstanbul.example.",
        ];

        for input in &inputs {
            let once = normalize(input);
            let twice = normalize(&once);
            assert_that(&twice).named(input).is_equal_to(&once);
        }
    }

    #[test]
    fn normalize_domain_removes_slashes() {
        assert_that(&normalize_domain("https://Example.co.za/")).is_equal_to("example.co.za".to_string());
        assert_that(&normalize_domain("example.co.za/path/")).is_equal_to("example.co.zapath".to_string());
    }

    #[test]
    fn nameserver_set_keeps_order_and_duplicates() {
        let set = NameserverSet::new(vec!["NS2.example.com.", "ns1.example.com", "ns2.example.com", " "]);

        assert_that(&set.to_vec()).is_equal_to(vec![
            "ns2.example.com".to_string(),
            "ns1.example.com".to_string(),
            "ns2.example.com".to_string(),
        ]);
    }

    #[test]
    fn nameserver_set_display() {
        let set = NameserverSet::new(vec!["ns1.example.com", "ns2.example.com"]);

        assert_that(&set.to_string()).is_equal_to("ns1.example.com, ns2.example.com".to_string());
    }
}
