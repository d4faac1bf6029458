#![allow(dead_code)]

use bytes::Bytes;
use ndns_application::ports::RecordCodec;
use ndns_domain::{
    Config, ContentType, Name, RecordData, RecordSet, RecordSetMessage, RecordType,
    SignedObject, TrustAnchor,
};
use ndns_infrastructure::ndns::{
    rrset_data_name, CachingQuery, DataSigner, InMemoryTransport, NdnsResolverBuilder,
    WireRecordCodec,
};
use std::sync::Arc;

pub const LONG_FRESHNESS: u32 = 3600;

pub fn name(uri: &str) -> Name {
    Name::parse(uri).unwrap()
}

// ============================================================================
// Zone
// ============================================================================

/// A signing zone and the hint its data is served behind
pub struct Zone {
    pub name: Name,
    pub signer: DataSigner,
    pub hint: Option<Name>,
}

impl Zone {
    pub fn new(zone: &str, key_label: &str, hint: Option<&str>) -> Self {
        let zone_name = name(zone);
        let key_name = zone_name
            .clone()
            .append("DNS")
            .append_name(&name(key_label))
            .append("NDNCERT");
        Self {
            name: zone_name,
            signer: DataSigner::generate(key_name).unwrap(),
            hint: hint.map(name),
        }
    }

    pub fn key_name(&self) -> &Name {
        self.signer.key_name()
    }
}

// ============================================================================
// Hierarchy
// ============================================================================

/// Three zones served by one in-memory transport:
///
/// - root (`/`), signed by the trust anchor `/DNS/ksk-1/NDNCERT`
/// - `/ndn`, delegated from root, served behind `/hub/ndn`
/// - `/ndn/edu/ucla`, delegated from `/ndn` across the delegation marker
///   at `/ndn/DNS/edu/NS`, served behind `/hub/ucla`
///
/// Each zone publishes `www/NS` as NEXISTS and a `www/TXT` record.
pub struct Hierarchy {
    pub transport: Arc<InMemoryTransport>,
    pub root: Zone,
    pub ndn: Zone,
    pub ucla: Zone,
    codec: WireRecordCodec,
}

impl Hierarchy {
    pub fn new() -> Self {
        let hierarchy = Self {
            transport: Arc::new(InMemoryTransport::new()),
            root: Zone::new("/", "/ksk-1", None),
            ndn: Zone::new("/ndn", "/zsk-1", Some("/hub/ndn")),
            ucla: Zone::new("/ndn/edu/ucla", "/zsk-1", Some("/hub/ucla")),
            codec: WireRecordCodec::new(),
        };
        hierarchy.publish_defaults();
        hierarchy
    }

    fn publish_defaults(&self) {
        // root -> /ndn
        self.publish(&self.root, "/ndn", RecordType::NS, ns("ndn", "ns1.ndn"));
        self.publish(&self.root, "/ndn/ns1", RecordType::FH, fh("ns1.ndn", "/hub/ndn"));
        self.publish_certificate(&self.root, &self.ndn, LONG_FRESHNESS);

        // /ndn -> /ndn/edu/ucla
        self.publish(
            &self.ndn,
            "/edu",
            RecordType::NS,
            delegation_marker("edu", "/ndn/edu/ucla"),
        );
        self.publish(
            &self.ndn,
            "/edu/ucla",
            RecordType::NS,
            ns("ucla.edu", "ns1.ucla.edu.ndn"),
        );
        self.publish(
            &self.ndn,
            "/edu/ucla/ns1",
            RecordType::FH,
            fh("ns1.ucla.edu", "/hub/ucla"),
        );
        self.publish_certificate(&self.ndn, &self.ucla, LONG_FRESHNESS);

        self.publish(&self.ndn, "/www", RecordType::NS, nexists("www"));
        self.publish(&self.ndn, "/www", RecordType::TXT, txt("www", "hello from ndn"));
        self.publish(&self.ucla, "/www", RecordType::NS, nexists("www"));
        self.publish(&self.ucla, "/www", RecordType::TXT, txt("www", "hello from ucla"));
    }

    /// Sign `message` in `zone` under `<zone>/DNS/<label>/<TYPE>/%FD%01`
    pub fn publish(
        &self,
        zone: &Zone,
        label: &str,
        record_type: RecordType,
        message: RecordSetMessage,
    ) {
        self.publish_with(zone, label, record_type, message, LONG_FRESHNESS, 1);
    }

    pub fn publish_with(
        &self,
        zone: &Zone,
        label: &str,
        record_type: RecordType,
        message: RecordSetMessage,
        freshness: u32,
        version: u64,
    ) {
        let data_name = rrset_data_name(&zone.name, &name(label), record_type, version);
        let content = self.encode(&message);
        let object = zone
            .signer
            .sign(data_name, content, ContentType::Data, freshness);
        self.serve(zone, object);
    }

    pub fn encode(&self, message: &RecordSetMessage) -> Bytes {
        self.codec.serialize(message).unwrap()
    }

    /// `parent` certifies the key of `child`; served inside `child`
    pub fn publish_certificate(&self, parent: &Zone, child: &Zone, freshness: u32) {
        let certificate = parent.signer.certify(
            child.key_name().clone().append_version(1),
            &child.signer.public_key(),
            freshness,
        );
        self.serve(child, certificate);
    }

    pub fn serve(&self, zone: &Zone, object: SignedObject) {
        match &zone.hint {
            Some(hint) => self.transport.publish_behind(hint.clone(), object),
            None => self.transport.publish(object),
        }
    }

    pub fn anchor(&self) -> TrustAnchor {
        TrustAnchor::new(
            self.root.key_name().clone(),
            Name::root(),
            self.root.signer.public_key(),
        )
    }

    pub fn resolver(&self) -> Arc<CachingQuery> {
        self.resolver_with_config(Config::default())
    }

    pub fn resolver_with_config(&self, config: Config) -> Arc<CachingQuery> {
        NdnsResolverBuilder::new(self.transport.clone())
            .with_config(config)
            .with_trust_anchor(self.anchor())
            .build()
            .unwrap()
    }

    /// Interests received by the transport with any hint stripped
    pub async fn inner_interests(&self) -> Vec<Name> {
        self.transport
            .interests()
            .await
            .into_iter()
            .map(|interest| match interest.split_encapsulated() {
                Some((_, inner)) => inner,
                None => interest,
            })
            .collect()
    }
}

// ============================================================================
// Record-set builders
// ============================================================================

pub fn ns(owner: &str, target: &str) -> RecordSetMessage {
    RecordSetMessage::new().with_answer(RecordSet::new(owner, RecordType::NS).with_record(
        LONG_FRESHNESS,
        RecordData::Ns {
            target: target.into(),
        },
    ))
}

pub fn fh(owner: &str, hint: &str) -> RecordSetMessage {
    RecordSetMessage::new().with_answer(RecordSet::new(owner, RecordType::FH).with_record(
        LONG_FRESHNESS,
        RecordData::Fh {
            priority: 10,
            weight: 1,
            hint: name(hint),
        },
    ))
}

pub fn delegation_marker(owner: &str, zone: &str) -> RecordSetMessage {
    RecordSetMessage::new().with_authority(
        RecordSet::new(owner, RecordType::NDNAUTH)
            .with_record(LONG_FRESHNESS, RecordData::NdnAuth { zone: name(zone) }),
    )
}

pub fn nexists(owner: &str) -> RecordSetMessage {
    RecordSetMessage::new().with_answer(
        RecordSet::new(owner, RecordType::NEXISTS).with_record(LONG_FRESHNESS, RecordData::NExists),
    )
}

pub fn txt(owner: &str, text: &str) -> RecordSetMessage {
    RecordSetMessage::new().with_answer(
        RecordSet::new(owner, RecordType::TXT)
            .with_record(LONG_FRESHNESS, RecordData::Txt(vec![text.into()])),
    )
}
