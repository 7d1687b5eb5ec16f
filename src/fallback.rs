//! Bundled snapshot served when live acquisition yields nothing.

use once_cell::sync::Lazy;

use crate::scrape::types::{SubsidyRecord, SubsidyStatus};

struct Seed {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    title: &'static str,
    description: &'static str,
    deadline: &'static str,
    amount_info: &'static str,
    eligibility: [&'static str; 3],
    url: &'static str,
}

const SEEDS: [Seed; 7] = [
    Seed {
        id: "wbso-2024",
        name: "WBSO",
        category: "Fiscaal",
        title: "WBSO - Afdrachtvermindering speur- en ontwikkelingswerk",
        description: "De WBSO is een fiscale regeling waarmee u de loonkosten van uw R&D-medewerkers kunt verlagen. U betaalt minder loonheffingen en premies voor werknemers die speur- en ontwikkelingswerk doen.",
        deadline: "30 september 2024",
        amount_info: "Tot 32% afdrachtvermindering",
        eligibility: [
            "Bedrijven met S&O-activiteiten in Nederland",
            "Minimaal 500 S&O-uren per jaar",
            "Technisch nieuw product, proces of programmatuur",
        ],
        url: "https://www.rvo.nl/subsidies-financiering/wbso",
    },
    Seed {
        id: "sde-2024",
        name: "SDE++",
        category: "Energie",
        title: "SDE++ - Stimulering Duurzame Energieproductie en Klimaattransitie",
        description: "De SDE++ subsidie is bedoeld voor bedrijven die hernieuwbare energie produceren of CO2-reducerende technieken toepassen. De subsidie compenseert het verschil tussen de kostprijs van duurzame energie en de marktprijs.",
        deadline: "Najaar 2024",
        amount_info: "Afhankelijk van technologie en productie",
        eligibility: [
            "Energieproductie uit hernieuwbare bronnen",
            "CO2-reducerende maatregelen",
            "Minimale projectomvang vereist",
        ],
        url: "https://www.rvo.nl/subsidies-financiering/sde",
    },
    Seed {
        id: "mit-2024",
        name: "MIT",
        category: "Innovatie",
        title: "MIT - MKB Innovatiestimulering Regio en Topsectoren",
        description: "De MIT-regeling stimuleert innovatie bij het MKB. U kunt subsidie krijgen voor haalbaarheidsprojecten, R&D-samenwerkingsprojecten en kennisvouchers.",
        deadline: "Meerdere rondes per jaar",
        amount_info: "Tot 40% subsidie op projectkosten",
        eligibility: [
            "MKB-onderneming",
            "Innovatie- of R&D-project",
            "Samenwerking met kennisinstelling (bij R&D)",
        ],
        url: "https://www.rvo.nl/subsidies-financiering/mit",
    },
    Seed {
        id: "eia-2024",
        name: "EIA",
        category: "Energie",
        title: "EIA - Energie-investeringsaftrek",
        description: "Met de EIA kunt u fiscaal voordeel behalen bij investeringen in energiebesparende bedrijfsmiddelen en duurzame energie. U mag een percentage van de investering aftrekken van de fiscale winst.",
        deadline: "Binnen 3 maanden na investering",
        amount_info: "45,5% extra aftrek in 2024",
        eligibility: [
            "Investering in bedrijfsmiddel op de Energielijst",
            "Minimaal €2.500 per bedrijfsmiddel",
            "Aanvraag binnen 3 maanden na opdracht",
        ],
        url: "https://www.rvo.nl/subsidies-financiering/eia",
    },
    Seed {
        id: "mia-vamil-2024",
        name: "MIA/Vamil",
        category: "Milieu",
        title: "MIA/Vamil - Milieu-investeringsaftrek en Willekeurige afschrijving",
        description: "Met MIA krijgt u een extra aftrekmogelijkheid van de fiscale winst. Met Vamil mag u zelf bepalen wanneer u afschrijft. Hiermee krijgt u een liquiditeits- en rentevoordeel.",
        deadline: "Binnen 3 maanden na investering",
        amount_info: "Tot 45% MIA + Vamil",
        eligibility: [
            "Investering in bedrijfsmiddel op de Milieulijst",
            "Minimaal €2.500 per bedrijfsmiddel",
            "Aanvraag binnen 3 maanden na opdracht",
        ],
        url: "https://www.rvo.nl/subsidies-financiering/mia-vamil",
    },
    Seed {
        id: "innovatiebox-2024",
        name: "Innovatiebox",
        category: "Fiscaal",
        title: "Innovatiebox - Verlaagd vennootschapsbelastingtarief",
        description: "Met de Innovatiebox betaalt u een verlaagd tarief vennootschapsbelasting (9% in plaats van tot 25,8%) over de winst die u behaalt met innovatieve activiteiten.",
        deadline: "Jaarlijkse belastingaangifte",
        amount_info: "9% VPB-tarief op innovatiewinst",
        eligibility: [
            "WBSO-verklaring of octrooi",
            "Zelfontworpen immaterieel activum",
            "Aantoonbare innovatieactiviteiten",
        ],
        url: "https://www.rvo.nl/subsidies-financiering/innovatiebox",
    },
    Seed {
        id: "bmkb-2024",
        name: "BMKB",
        category: "Financiering",
        title: "BMKB - Borgstelling MKB-kredieten",
        description: "Met de BMKB garandeert de overheid een deel van uw banklening. Hierdoor kunt u makkelijker financiering krijgen als u onvoldoende zekerheden heeft.",
        deadline: "Doorlopend beschikbaar",
        amount_info: "Borgstelling tot 90% van krediet",
        eligibility: [
            "MKB-onderneming",
            "Levensvatbaar ondernemingsplan",
            "Onvoldoende eigen zekerheden",
        ],
        url: "https://www.rvo.nl/subsidies-financiering/bmkb",
    },
];

static FALLBACK: Lazy<Vec<SubsidyRecord>> = Lazy::new(|| {
    SEEDS
        .iter()
        .map(|s| SubsidyRecord {
            id: s.id.to_string(),
            name: s.name.to_string(),
            category: s.category.to_string(),
            url: s.url.to_string(),
            title: s.title.to_string(),
            description: s.description.to_string(),
            deadline: s.deadline.to_string(),
            status: SubsidyStatus::Open,
            amount_info: s.amount_info.to_string(),
            eligibility: s.eligibility.iter().map(|e| e.to_string()).collect(),
            last_updated: None,
        })
        .collect()
});

/// The static fallback set, in its curated order.
pub fn fallback_subsidies() -> &'static [SubsidyRecord] {
    &FALLBACK
}
