//! Prints every CRD of the provider as a multi-document YAML stream
//!
//! Usage: `cargo run -p crds --bin crdgen > package/crds.yaml`

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    for crd in crds::all_crds() {
        let name = crd.metadata.name.clone().unwrap_or_default();
        let yaml = serde_yaml::to_string(&crd)
            .with_context(|| format!("failed to serialize CRD {name}"))?;
        println!("---");
        print!("{yaml}");
    }
    Ok(())
}
