//! Prints the CRD manifests for all managed kinds as a multi-document
//! YAML stream, suitable for `kubectl apply -f -`.

use crds::{PublicIPAddress, RouteTable, VirtualNetwork};
use kube::CustomResourceExt;

fn main() -> Result<(), serde_yaml::Error> {
    print!("{}", serde_yaml::to_string(&VirtualNetwork::crd())?);
    println!("---");
    print!("{}", serde_yaml::to_string(&PublicIPAddress::crd())?);
    println!("---");
    print!("{}", serde_yaml::to_string(&RouteTable::crd())?);
    Ok(())
}
