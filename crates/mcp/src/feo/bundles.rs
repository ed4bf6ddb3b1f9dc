//! Placement defaults for the console bundles.

/// Navigation position used when a bundle has no preferred slot.
pub const DEFAULT_POSITION: u32 = 1000;

pub const SECTION_PLACEHOLDER: &str = "[SERVICE-SECTION]";
pub const GROUP_PLACEHOLDER: &str = "[SERVICE-GROUP]";
pub const ICON_PLACEHOLDER: &str = "[ICON]";

/// Where an application of a given bundle usually lands in the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleProfile {
    pub position: u32,
    pub product: String,
    pub section: &'static str,
    pub group: &'static str,
    pub icon: &'static str,
}

impl BundleProfile {
    /// Whether the service tile values still need to be filled in by hand.
    pub fn has_placeholders(&self) -> bool {
        self.section == SECTION_PLACEHOLDER
    }
}

/// Product name shown for well-known bundles.
pub fn product_name(bundle: &str) -> String {
    match bundle {
        "insights" => "Red Hat Insights".to_string(),
        "openshift" => "Red Hat OpenShift".to_string(),
        "ansible" => "Red Hat Ansible Automation Platform".to_string(),
        "settings" => "Settings".to_string(),
        "iam" => "Identity & Access Management".to_string(),
        "subscriptions" => "Subscription Services".to_string(),
        other => other.to_string(),
    }
}

/// Recommended position, service section, group and icon for `bundle`.
///
/// Unknown bundles get the default position and placeholder tile values.
pub fn bundle_profile(bundle: &str) -> BundleProfile {
    let (position, section, group, icon) = match bundle {
        "insights" => (200, "observe", "rhel", "InsightsIcon"),
        "openshift" => (300, "deploy", "openshift", "OpenShiftIcon"),
        "ansible" => (400, "automation", "ansible", "AnsibleIcon"),
        "subscriptions" => (600, "spend-management", "subscriptions", "SubscriptionsIcon"),
        "settings" => (800, "platform", "settings", "CogIcon"),
        "iam" => (900, "iam", "iam", "UsersIcon"),
        _ => (DEFAULT_POSITION, SECTION_PLACEHOLDER, GROUP_PLACEHOLDER, ICON_PLACEHOLDER),
    };
    BundleProfile {
        position,
        product: product_name(bundle),
        section,
        group,
        icon,
    }
}

/// Markdown section listing the bundle defaults.
pub fn render_bundle_recommendations(bundle: &str) -> String {
    let profile = bundle_profile(bundle);
    format!(
        "## Bundle-Specific Recommendations for '{bundle}'\n\
         - Position: {}\n\
         - Product: {}\n\
         - Service Section: {}\n\
         - Service Group: {}\n\
         - Icon: {}\n",
        profile.position, profile.product, profile.section, profile.group, profile.icon
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_bundles_have_tile_values() {
        let profile = bundle_profile("openshift");

        assert_eq!(profile.position, 300);
        assert_eq!(profile.product, "Red Hat OpenShift");
        assert_eq!((profile.section, profile.group, profile.icon), ("deploy", "openshift", "OpenShiftIcon"));
        assert!(!profile.has_placeholders());
    }

    #[test]
    fn unknown_bundles_fall_back_to_placeholders() {
        let profile = bundle_profile("edge");

        assert_eq!(profile.position, DEFAULT_POSITION);
        assert_eq!(profile.product, "edge");
        assert!(profile.has_placeholders());
    }

    #[test]
    fn renders_recommendation_section() {
        let text = render_bundle_recommendations("insights");

        assert_eq!(
            text,
            "## Bundle-Specific Recommendations for 'insights'\n\
             - Position: 200\n\
             - Product: Red Hat Insights\n\
             - Service Section: observe\n\
             - Service Group: rhel\n\
             - Icon: InsightsIcon\n"
        );
    }
}
