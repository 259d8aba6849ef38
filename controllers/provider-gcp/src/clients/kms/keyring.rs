//! KeyRing translation
//!
//! Key rings have no mutable fields and cannot be deleted.

use crds::KeyRingObservation;
use gcp_client::models::kms as gcp;

/// `projects/{project}/locations/{location}`
pub fn key_ring_parent(project: &str, location: &str) -> String {
    format!("projects/{project}/locations/{location}")
}

/// Full resource name of a key ring
pub fn key_ring_name(project: &str, location: &str, key_ring_id: &str) -> String {
    format!("{}/keyRings/{key_ring_id}", key_ring_parent(project, location))
}

pub fn generate_key_ring_observation(key_ring: &gcp::KeyRing) -> KeyRingObservation {
    KeyRingObservation {
        create_time: key_ring.create_time.clone(),
        name: key_ring.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ring_name() {
        assert_eq!(
            key_ring_name("p", "global", "ring"),
            "projects/p/locations/global/keyRings/ring"
        );
    }

    #[test]
    fn test_observation() {
        let observation = generate_key_ring_observation(&gcp::KeyRing {
            name: "projects/p/locations/global/keyRings/ring".to_string(),
            create_time: "2024-01-01T00:00:00Z".to_string(),
        });
        assert_eq!(observation.name, "projects/p/locations/global/keyRings/ring");
        assert_eq!(observation.create_time, "2024-01-01T00:00:00Z");
    }
}
