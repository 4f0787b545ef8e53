//! Class names the page markup and the controller agree on.

pub const SECTION: &str = "section";
pub const CARD: &str = "card";
pub const POSITION_ITEM: &str = "position-item";
pub const ACHIEVEMENT_ITEM: &str = "achievement-item";
pub const POSITION_ICON: &str = "position-icon";
pub const ACHIEVEMENT_ICON: &str = "achievement-icon";

pub const SKILL_TAG: &str = "skill-tag";
pub const CERT_TAG: &str = "cert-tag";
pub const EXPERIENCE_ITEM: &str = "experience-item";
pub const EDUCATION_ITEM: &str = "education-item";
pub const PROJECT_ITEM: &str = "project-item";
pub const CONTACT_ITEM: &str = "contact-item";

pub const LOGO_UPLOAD: &str = "logo-upload";
pub const PROFILE_PIC: &str = "profile-pic";
pub const PROFILE_SECTION: &str = "profile-section";
pub const SECTION_TITLE: &str = "section-title";
pub const ITEM_TITLE: &str = "item-title";

/// State flags written by the controller.
pub const HAS_IMAGE: &str = "has-image";
pub const HAS_LOGO: &str = "has-logo";
pub const ANIMATE_IN: &str = "animate-in";
