//! Deployment and Service shapes for the two fixed component roles.

use std::collections::BTreeMap;

use k8s_openapi::{
    api::{
        apps::v1::DeploymentSpec,
        core::v1::{
            Container, ContainerPort, PodSpec, PodTemplateSpec, ResourceRequirements, ServicePort,
            ServiceSpec,
        },
    },
    apimachinery::pkg::{
        api::resource::Quantity, apis::meta::v1::LabelSelector, util::intstr::IntOrString,
    },
};
use kube::core::ObjectMeta;

use crate::labels::selector_labels;

/// One of the two fixed component roles of an application.
///
/// Ports and resource requests/limits are compile-time policy per role, not
/// derived from the custom resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The API workload, served on port 5000.
    Backend,
    /// The web workload, served on port 80.
    Frontend,
}

impl Role {
    /// Both roles in reconcile order.
    pub const ALL: [Role; 2] = [Role::Backend, Role::Frontend];

    /// Role name as used in resource names, labels and container names.
    pub fn name(self) -> &'static str {
        match self {
            Role::Backend => "backend",
            Role::Frontend => "frontend",
        }
    }

    /// Fixed container and service port for the role.
    pub fn port(self) -> i32 {
        match self {
            Role::Backend => 5000,
            Role::Frontend => 80,
        }
    }

    /// Name of the Deployment managed for this role.
    ///
    /// Also used as the selector label value, so two applications or two
    /// roles never collide.
    pub fn workload_name(self, app: &str) -> String {
        format!("{app}-{}", self.name())
    }

    /// Name of the Service exposing this role's workload.
    pub fn service_name(self, app: &str) -> String {
        format!("{app}-{}-service", self.name())
    }

    fn resources(self) -> ResourceRequirements {
        let (requests, limits) = match self {
            Role::Backend => (("256Mi", "250m"), ("512Mi", "500m")),
            Role::Frontend => (("64Mi", "100m"), ("256Mi", "250m")),
        };
        ResourceRequirements {
            requests: Some(quantities(requests)),
            limits: Some(quantities(limits)),
            ..Default::default()
        }
    }
}

fn quantities((memory, cpu): (&str, &str)) -> BTreeMap<String, Quantity> {
    BTreeMap::from_iter([
        ("memory".to_owned(), Quantity(memory.to_owned())),
        ("cpu".to_owned(), Quantity(cpu.to_owned())),
    ])
}

/// Construct the DeploymentSpec for one component.
///
/// The selector and the pod template label both equal the workload name so
/// the paired Service selects exactly these pods.
pub fn deployment_spec(role: Role, app: &str, image: &str, replicas: i32) -> DeploymentSpec {
    let selector = selector_labels(&role.workload_name(app));
    DeploymentSpec {
        replicas: Some(replicas),
        selector: LabelSelector {
            match_labels: selector.clone(),
            ..Default::default()
        },
        template: PodTemplateSpec {
            metadata: Some(ObjectMeta {
                labels: selector,
                ..Default::default()
            }),
            spec: Some(PodSpec {
                containers: vec![Container {
                    name: role.name().to_owned(),
                    image: Some(image.to_owned()),
                    ports: Some(vec![ContainerPort {
                        container_port: role.port(),
                        ..Default::default()
                    }]),
                    resources: Some(role.resources()),
                    ..Default::default()
                }],
                ..Default::default()
            }),
        },
        ..Default::default()
    }
}

/// Construct the ServiceSpec exposing one component's workload.
///
/// The exposed port equals the target port, there is no port translation.
pub fn service_spec(role: Role, app: &str) -> ServiceSpec {
    ServiceSpec {
        selector: selector_labels(&role.workload_name(app)),
        ports: Some(vec![ServicePort {
            protocol: Some("TCP".to_owned()),
            port: role.port(),
            target_port: Some(IntOrString::Int(role.port())),
            ..Default::default()
        }]),
        ..Default::default()
    }
}
