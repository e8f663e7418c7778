//! Static bio and contact content shown next to the graph.

pub const OWNER_NAME: &str = "Nasuhan Yunus Özkaya";
pub const OWNER_TITLE: &str = "Systems Engineer // Level 4";
pub const TAGLINE: &str = "A developer who builds systems, reflects on failure, and designs meaning.";
pub const INTRO_SUBTITLE: &str = "ENTROPY TO ORDER";

pub struct BioRow {
    pub label: &'static str,
    pub value: &'static str,
}

pub struct BioSection {
    pub title: &'static str,
    pub rows: &'static [BioRow],
    pub bullets: &'static [&'static str],
    pub tags: &'static [&'static str],
}

pub const BIO_SECTIONS: &[BioSection] = &[
    BioSection {
        title: "Core Identity",
        rows: &[
            BioRow {
                label: "Role",
                value: "Software Engineer",
            },
            BioRow {
                label: "Focus",
                value: "Systems Thinking",
            },
        ],
        bullets: &[],
        tags: &[],
    },
    BioSection {
        title: "Education Module",
        rows: &[
            BioRow {
                label: "Institution",
                value: "Iskenderun Technical University",
            },
            BioRow {
                label: "Degree",
                value: "B.S. Computer Engineering",
            },
        ],
        bullets: &[],
        tags: &[
            "Software Eng. Fundamentals",
            "Data Structures & Algo",
            "Computational Thinking",
        ],
    },
    BioSection {
        title: "Experience Log",
        rows: &[BioRow {
            label: "Ministry of Justice (Turkey)",
            value: "Big Data & AI Bureau // Intern",
        }],
        bullets: &[
            "Large-scale Excel & structured data processing",
            "Data cleaning & normalization pipelines",
            "Analytics reporting (Python/Streamlit)",
            "System design under institutional constraints",
        ],
        tags: &[],
    },
    BioSection {
        title: "Technical Matrix",
        rows: &[],
        bullets: &[],
        tags: &["JavaScript (ES6+)", "TypeScript", "Python", "C#"],
    },
];

pub struct ContactLink {
    pub label: &'static str,
    pub value: &'static str,
    pub href: &'static str,
}

pub const CONTACT_LINKS: &[ContactLink] = &[
    ContactLink {
        label: "Email",
        value: "nasuhan.yunus.ozkaya@gmail.com",
        href: "mailto:nasuhan.yunus.ozkaya@gmail.com",
    },
    ContactLink {
        label: "LinkedIn",
        value: "nyunus-ozkaya",
        href: "https://www.linkedin.com/in/nyunus-ozkaya/",
    },
    ContactLink {
        label: "GitHub",
        value: "YunusOzkaya",
        href: "https://github.com/YunusOzkaya",
    },
];

pub const AVAILABILITY: &str = "OPEN TO WORK";
