//! Conversion between native names and dotted DNS-style names
//!
//! `dnsify` reverses the component order and splits dotted components into
//! separate labels, so `/ndn/ucla.edu/irl` becomes `irl.ucla.edu.ndn`.
//! `ndnify` is the inverse for names whose components contain no periods.

use super::name::{Component, Name};
use super::DomainError;

/// Convert a native name into its dotted DNS form (`.` for the root)
///
/// Labels are taken as UTF-8 text without IDNA (punycode) encoding, so
/// `ndnify(dnsify(name))` gives back `name` for non-ASCII components too.
pub fn dnsify(name: &Name) -> Result<String, DomainError> {
    if name.is_root() {
        return Ok(".".to_string());
    }

    let mut labels = Vec::with_capacity(name.len());
    for component in name.iter().rev() {
        let text = component.as_str().ok_or_else(|| {
            DomainError::InvalidName(format!(
                "component [{}] of [{}] is not valid UTF-8 and cannot be dnsified",
                component, name
            ))
        })?;
        if text.is_empty() {
            return Err(DomainError::InvalidName(format!(
                "empty component in [{}] cannot be dnsified",
                name
            )));
        }
        labels.extend(text.split('.'));
    }

    Ok(labels.join("."))
}

/// Convert a dotted DNS-style name into a native name
pub fn ndnify(dns_name: &str) -> Name {
    let trimmed = dns_name.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Name::root();
    }

    Name::from_components(trimmed.split('.').rev().map(Component::from_text))
}

/// Label of the dotted `dns_name` relative to `zone`, in native form
///
/// The comparison is done on DNS labels, so a zone with a dotted component
/// (`/ndn/ucla.edu`) contains `ns1.irl.ucla.edu.ndn`, whose relative label
/// is `/irl/ns1`. `None` when `dns_name` is not inside `zone`.
pub fn relative_label(zone: &Name, dns_name: &str) -> Result<Option<Name>, DomainError> {
    let zone_dns = dnsify(zone)?;
    let zone_labels: Vec<&str> = match zone_dns.as_str() {
        "." => Vec::new(),
        dotted => dotted.split('.').collect(),
    };

    let trimmed = dns_name.trim().trim_end_matches('.');
    let labels: Vec<&str> = if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('.').collect()
    };

    if !labels.ends_with(&zone_labels) {
        return Ok(None);
    }

    let relative = labels[..labels.len() - zone_labels.len()].join(".");
    Ok(Some(ndnify(&relative)))
}

/// Logical (dns-ified) labels for one native component: `ucla.edu` becomes
/// the two labels `edu`, `ucla`
pub fn logical_labels(component: &Component) -> Result<Name, DomainError> {
    let text = component.as_str().ok_or_else(|| {
        DomainError::InvalidName(format!("component [{}] is not valid UTF-8", component))
    })?;
    Ok(ndnify(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dnsify() {
        let name = Name::parse("/ndn/ucla.edu/irl").unwrap();
        assert_eq!(dnsify(&name).unwrap(), "irl.ucla.edu.ndn");
        assert_eq!(dnsify(&Name::root()).unwrap(), ".");
        assert_eq!(dnsify(&Name::parse("/com").unwrap()).unwrap(), "com");
    }

    #[test]
    fn test_ndnify() {
        assert_eq!(
            ndnify("www.example.com."),
            Name::parse("/com/example/www").unwrap()
        );
        assert_eq!(ndnify("."), Name::root());
        assert_eq!(ndnify(""), Name::root());
    }

    #[test]
    fn test_roundtrip_without_reserved_characters() {
        for uri in ["/a/b/c", "/ndn/edu/ucla/irl", "/x", "/", "/caf\u{e9}"] {
            let name = Name::parse(uri).unwrap();
            assert_eq!(ndnify(&dnsify(&name).unwrap()), name, "roundtrip of {}", uri);
        }
    }

    #[test]
    fn test_relative_label_through_dotted_component() {
        let zone = Name::parse("/ndn/ucla.edu").unwrap();
        assert_eq!(
            relative_label(&zone, "ns1.irl.ucla.edu.ndn").unwrap(),
            Some(Name::parse("/irl/ns1").unwrap())
        );
        assert_eq!(
            relative_label(&Name::parse("/ndn").unwrap(), "ns1.ucla.edu.ndn").unwrap(),
            Some(Name::parse("/edu/ucla/ns1").unwrap())
        );
        assert_eq!(
            relative_label(&Name::root(), "ns1.ndn.").unwrap(),
            Some(Name::parse("/ndn/ns1").unwrap())
        );
    }

    #[test]
    fn test_relative_label_outside_zone() {
        let zone = Name::parse("/ndn/ucla.edu").unwrap();
        assert_eq!(relative_label(&zone, "ns1.cs.example").unwrap(), None);
        assert_eq!(relative_label(&zone, "ns1.edu.ndn").unwrap(), None);
        // label-wise, not textual suffix
        assert_eq!(relative_label(&zone, "ns1.xucla.edu.ndn").unwrap(), None);
    }

    #[test]
    fn test_logical_labels() {
        let labels = logical_labels(&Component::from("ucla.edu")).unwrap();
        assert_eq!(labels, Name::parse("/edu/ucla").unwrap());

        let single = logical_labels(&Component::from("www")).unwrap();
        assert_eq!(single, Name::parse("/www").unwrap());
    }

    #[test]
    fn test_non_utf8_component_rejected() {
        let name = Name::root().append(Component::new(vec![0xFFu8, 0xFE]));
        assert!(matches!(dnsify(&name), Err(DomainError::InvalidName(_))));
    }
}
