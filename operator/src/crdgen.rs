//! Prints the TodoApp CRD as YAML for cluster registration.
use kube::CustomResourceExt;

use todo_operator::app::TodoApp;

fn main() {
    print!("{}", serde_yaml::to_string(&TodoApp::crd()).unwrap());
}
