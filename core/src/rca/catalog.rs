//! Fixed 4M cause catalogs offered on the root-cause worksheet.
//!
//! The option strings are the site's agreed wording and are stored
//! verbatim in submitted reports, typos and all. Do not edit them
//! without a matching data migration.

pub const MAN_CAUSES: &[&str] = &[
    "Lack of training or awareness about safety procedures.",
    "Fatigue or physical stress due to long working hours.",
    "Non-compliance with PPE requirements.",
    "Improper manual handling techniques.",
    "Lack of Proper Security Measures",
    "Carelessness or negligence by operator",
    "New manpower engage.",
    "Inadequate supervision or lack of communication.",
    "Dishonest worker",
];

pub const MACHINE_CAUSES: &[&str] = &[
    "Malfunctioning or poorly maintained equipment.",
    "Absence of pre-use inspections for machinery.",
    "Lack of safety guards or interlocks on machines.",
    "Use of outdated or inappropriate tools/equipment.",
    "Overloading of handling equipment.",
    "Faulty Handling Equipment.",
    "Wrong vehicle/equipment selection.",
];

pub const METHOD_CAUSES: &[&str] = &[
    "Non-adherence to standard operating procedures.",
    "Use of outdated or inefficient work (wrong) methods.",
    "Unsafe lifting techniques",
    "Poor planning and scheduling.",
    "Poor labelling or identification of materials.",
    "Rough Handling",
    "Warehouse Structural Problems i.e. Leaky roofs, poor ventilation, or weak flooring.",
    "Inadequate Lighting & Security",
    "Poor pest control leads to the presence of rodents, cockroaches, and insects.",
    "Lack of clear workflows or processes for loading /unloading.",
    "Lack of Technology in Monitoring",
    "Use of damaged pallets or packaging",
    "Incorrect stacking or storage of goods",
    "Lack of Proper Inspection & Quality Checks",
    "Wrong material dispatch",
    "Weak Access Control",
    "Poor Lighting",
];

pub const MOTHER_NATURE_CAUSES: &[&str] = &[
    "Exposure to Moisture & Humidity leads to fungi, Corrosion & Rust",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CauseCategory {
    Man,
    Machine,
    Method,
    MotherNature,
}

impl CauseCategory {
    pub const ALL: [CauseCategory; 4] = [
        CauseCategory::Man,
        CauseCategory::Machine,
        CauseCategory::Method,
        CauseCategory::MotherNature,
    ];

    pub fn options(&self) -> &'static [&'static str] {
        match self {
            CauseCategory::Man => MAN_CAUSES,
            CauseCategory::Machine => MACHINE_CAUSES,
            CauseCategory::Method => METHOD_CAUSES,
            CauseCategory::MotherNature => MOTHER_NATURE_CAUSES,
        }
    }
}
