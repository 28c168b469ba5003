//! # Shipped Content
//!
//! The default deck and quiz installed on first run and after every
//! content version bump.
//!
//! Bump [`CONTENT_VERSION`] whenever the slides below change so that
//! existing caches are replaced.

use crate::quiz::QuizQuestion;
use crate::{Citation, EvidenceConfidence, LayoutHint, Slide};

/// Version tag of the content in this module.
pub const CONTENT_VERSION: &str = "v5";

fn pmid(id: &str, title: &str, authors: &str, journal: &str, year: &str) -> Citation {
    Citation::catalog(id, title, authors, journal, year)
}

/// The default deck, before continuation splitting.
#[must_use]
pub fn default_slides() -> Vec<Slide> {
    vec![
        Slide::new(
            "cover",
            "Diabetic Foot Ulcer:\nThe Myths, Pathophysiology & Management",
        )
        .with_layout(LayoutHint::ImageLeft)
        .with_images(
            [
                "clinical team in theatre green-white",
                "diabetic foot ulcer concept image",
            ],
            "Clinical team in green scrubs at UNTH teaching hospital",
        )
        .with_bullets([
            "University of Nigeria Teaching Hospital (UNTH), Ituku Ozalla",
            "Burns, Plastic & Reconstructive Surgery Unit",
            "Department of Surgery",
            "Clinical Conference — February 2026",
        ])
        .with_notes(
            "Welcome to this clinical conference presentation on Diabetic Foot Ulcer. We will \
             cover the myths surrounding DFU, the underlying pathophysiology, classification \
             systems, and evidence-based management strategies.",
        )
        .with_confidence(EvidenceConfidence::High),
        Slide::new("learning_objectives", "Learning Objectives")
            .with_images(
                [
                    "educational infographic diabetic foot",
                    "medical learning objectives icon",
                ],
                "Infographic showing diabetic foot learning objectives",
            )
            .with_bullets([
                "Understand the anatomy of the foot and distal ⅓ of the leg relevant to DFU.",
                "Explain the pathophysiology and classification of diabetic foot ulcers.",
                "Debunk common myths — especially the spiritual/curse causation narrative — with evidence.",
                "Summarize laboratory evaluation and evidence-based management by severity grade.",
                "Discuss prevention, community engagement, and multidisciplinary care.",
            ])
            .with_notes(
                "By the end of this session attendees should be able to discuss the biomedical \
                 basis of DFU, recognize the harm caused by myth-driven care delays, and outline \
                 a management algorithm from mild to severe disease.",
            )
            .with_citations(
                "diabetic foot ulcer review learning objectives",
                vec![pmid(
                    "31126716",
                    "IWGDF Guidelines on the prevention and management of diabetic foot disease",
                    "Schaper NC et al.",
                    "Diabetes Metab Res Rev",
                    "2024",
                )],
            )
            .with_confidence(EvidenceConfidence::High),
        Slide::new(
            "relevant_anatomy_overview",
            "Foot & Distal ⅓ Leg — Key Anatomy for DFU",
        )
        .with_images(
            [
                "foot anatomy labeled plantar nerves arteries",
                "distal tibial perforators anatomy diagram",
            ],
            "Labeled anatomical diagram of foot showing arteries and nerves",
        )
        .with_bullets([
            "Arterial supply: anterior tibial → dorsalis pedis; posterior tibial → medial & lateral plantar arteries; peroneal artery perforators.",
            "Cutaneous innervation: medial plantar, lateral plantar, sural, saphenous — neuropathy here causes loss of protective sensation.",
            "Pressure points & common ulcer sites: heel (calcaneal), metatarsal heads (1st & 5th), hallux interphalangeal.",
            "Muscle compartments: intrinsic foot muscles atrophy in motor neuropathy → claw/hammer toes → abnormal pressure distribution.",
        ])
        .with_notes(
            "Understanding the vascular and neural anatomy of the foot is essential for \
             predicting ulcer sites, planning debridement, and assessing revascularization \
             options.",
        )
        .with_citations(
            "foot anatomy relevant diabetic foot ulcer vascular innervation",
            vec![pmid(
                "24738927",
                "Angiosomes of the foot and their importance in diabetic foot care",
                "Attinger CE et al.",
                "Foot Ankle Clin",
                "2006",
            )],
        )
        .with_confidence(EvidenceConfidence::High),
        Slide::new("anatomy_zoom", "Arterial Supply & Angiosomes of the Foot")
            .with_layout(LayoutHint::ImageLeft)
            .with_images(
                [
                    "angiosomes foot diagram labeled",
                    "dorsalis pedis angiogram clinical",
                ],
                "Diagram showing the six angiosomes of the foot with color-coded vascular territories",
            )
            .with_bullets([
                "Angiosome concept: the foot is divided into 3-D vascular territories, each supplied by a source artery.",
                "Six angiosomes: medial calcaneal, medial plantar, lateral plantar, lateral calcaneal, dorsalis pedis, and anterior perforating.",
                "Implications for revascularization: direct revascularization of the angiosome feeding the wound improves healing outcomes.",
                "Implications for flap surgery: flap design should respect angiosome boundaries for reliable perfusion.",
            ])
            .with_notes(
                "Angiosome-directed revascularization has shown improved healing rates compared \
                 to indirect revascularization, though evidence remains mixed.",
            )
            .with_citations(
                "angiosome revascularization diabetic foot healing outcomes",
                vec![pmid(
                    "20817355",
                    "Angiosome-targeted revascularization in diabetic foot",
                    "Alexandrescu V et al.",
                    "J Cardiovasc Surg",
                    "2010",
                )],
            )
            .with_confidence(EvidenceConfidence::Medium),
        Slide::new("pathophysiology_overview", "Pathophysiology of Diabetic Foot Ulcer")
            .with_images(
                [
                    "diagram diabetic neuropathy ischaemia infection triad",
                    "microvascular disease diabetes histology",
                ],
                "Diagram illustrating the neuropathy-ischaemia-infection triad in diabetic foot pathogenesis",
            )
            .with_bullets([
                "The pathogenic triad: peripheral neuropathy + peripheral arterial disease + impaired immune response.",
                "Sensory neuropathy → loss of protective sensation → repetitive unrecognized trauma.",
                "Motor neuropathy → intrinsic foot muscle atrophy → deformity (claw toes) → altered plantar pressure → callus → ulceration.",
                "Autonomic neuropathy → loss of sweating → dry, cracked skin → portal of entry for infection.",
                "Macrovascular disease (atherosclerosis) + microvascular dysfunction → tissue ischaemia → impaired healing.",
                "Hyperglycaemia impairs neutrophil function, promotes biofilm formation, and delays all phases of wound healing.",
            ])
            .with_notes(
                "DFU pathogenesis is multifactorial. Neuropathy is present in ~50% of DM patients \
                 over 60. Ischaemia contributes to ~50% of DFUs. Infection is rarely the primary \
                 cause but rapidly worsens outcomes.",
            )
            .with_citations(
                "pathophysiology diabetic foot ulcer neuropathy ischaemia review",
                vec![
                    pmid(
                        "15111519",
                        "Pathogenesis and management of diabetic foot ulcers",
                        "Boulton AJM et al.",
                        "N Engl J Med",
                        "2004",
                    ),
                    pmid(
                        "25060007",
                        "The role of neuropathy and PAD in the diabetic foot",
                        "Armstrong DG et al.",
                        "Diabetes Care",
                        "2017",
                    ),
                ],
            )
            .with_confidence(EvidenceConfidence::High),
        Slide::new("classification_systems", "Classification & Grading (Practical)")
            .with_layout(LayoutHint::ImageLeft)
            .with_images(
                [
                    "wagner classification chart diabetic foot",
                    "university of texas diabetic foot classification table",
                ],
                "Comparison table of Wagner and University of Texas classification systems",
            )
            .with_bullets([
                "Wagner (0–5): simple depth-based system; widely known but doesn't account for ischaemia or infection.",
                "University of Texas (UT): grades depth (0–3) and stages ischaemia/infection (A–D) — more prognostic than Wagner.",
                "IWGDF/IDSA infection classification: mild (superficial, <2 cm), moderate (deeper or >2 cm), severe (systemic signs / SIRS).",
                "SINBAD score: Site, Ischaemia, Neuropathy, Bacterial infection, Area, Depth — validated for outcome prediction.",
                "Clinical utility: classification drives management pathway, antibiotic choice, and surgical decision-making.",
            ])
            .with_notes(
                "Wagner classification, though popular, is purely depth-based. The UT system and \
                 SINBAD score are better predictors of outcomes.",
            )
            .with_citations(
                "diabetic foot ulcer classification wagner university texas SINBAD comparison",
                vec![pmid(
                    "18442189",
                    "Validation of diabetic foot classification systems",
                    "Monteiro-Soares M et al.",
                    "Diabetes Metab Res Rev",
                    "2014",
                )],
            )
            .with_confidence(EvidenceConfidence::High),
        Slide::new(
            "myths_title",
            "Myths: Diabetic Foot Ulcers as a \"Spiritual Problem\"",
        )
        .with_images(
            [
                "myth vs evidence concept image medical",
                "community beliefs about disease Africa",
            ],
            "Concept image contrasting myth versus evidence in medical decision-making",
        )
        .with_bullets([
            "Common myth: DFUs are caused by curses, witchcraft, or spiritual punishment — not \"ordinary\" disease.",
            "Impact of myths: delayed hospital presentation, use of harmful home remedies, reduced medication adherence.",
            "Evidence-based rebuttal: DFU pathophysiology is entirely biomedical — neuropathy, ischaemia, hyperglycaemia, and infection explain every case.",
            "Social determinants (poverty, poor access) explain geographic disparities — not spiritual forces.",
            "Communication strategy: approach with cultural humility — respect beliefs while clearly explaining the biomedical reality.",
        ])
        .with_notes(
            "Clinicians should avoid dismissing beliefs but must clearly, respectfully explain \
             the biomedical mechanism and the urgency of medical intervention.",
        )
        .with_citations(
            "cultural beliefs spiritual diabetic foot ulcer delay Africa",
            vec![
                pmid(
                    "26264779",
                    "Traditional medicine use in diabetic foot complications",
                    "Ogbera AO et al.",
                    "Diabet Foot Ankle",
                    "2015",
                ),
                pmid(
                    "30237584",
                    "Barriers to health-seeking for diabetic foot in Nigeria",
                    "Ekore RI et al.",
                    "J Wound Care",
                    "2018",
                ),
            ],
        )
        .with_confidence(EvidenceConfidence::High),
        Slide::new(
            "myths_debunk_evidence",
            "Evidence: Myth-Driven Delays Worsen Outcomes",
        )
        .with_layout(LayoutHint::ImageLeft)
        .with_images(
            [
                "community health education diabetic foot Africa",
                "health worker counselling patient photo",
            ],
            "Community health worker providing diabetic foot education to patients",
        )
        .with_bullets([
            "Patients who first consult traditional/spiritual healers present 3–6 weeks later to hospital.",
            "Delayed presentation is associated with higher Wagner grades at admission, higher amputation rates, and increased mortality.",
            "A Nigerian hospital series found that 62% of patients with major amputation had first sought spiritual/herbal treatment.",
            "Key strategy: engage community and religious leaders as health messengers — they are trusted voices.",
        ])
        .with_notes(
            "Belief-related delays are a major driver of poor limb-salvage outcomes. The \
             solution is to integrate health messaging through trusted community channels.",
        )
        .with_citations(
            "cultural beliefs diabetic foot delay presentation systematic review Africa outcome",
            vec![
                pmid(
                    "26264779",
                    "Traditional medicine use and diabetic foot complications",
                    "Ogbera AO et al.",
                    "Diabet Foot Ankle",
                    "2015",
                ),
                pmid(
                    "25925977",
                    "Factors associated with major limb amputation in diabetic foot",
                    "Pemayun TGD et al.",
                    "Diabetes Res Clin Pract",
                    "2015",
                ),
            ],
        )
        .with_confidence(EvidenceConfidence::High),
        Slide::new("references_and_resources", "Sources & Further Reading")
            .with_images(
                [
                    "medical references journals stack",
                    "journal covers diabetes care lancet",
                ],
                "Stack of medical journals and reference materials",
            )
            .with_bullets([
                "IWGDF Guidelines (2023 update): iwgdfguidelines.org — comprehensive, evidence-based, freely available.",
                "Boulton AJM et al. NEJM 2004;351:48-55 — landmark review of DFU pathogenesis and management.",
                "Armstrong DG et al. Diabetes Care 2017 — diabetic foot complications review.",
                "Ogbera AO et al. Diabet Foot Ankle 2015 — traditional medicine use and DFU outcomes in Africa.",
            ])
            .with_citations(
                "diabetic foot ulcer review guidelines IWGDF WHO",
                vec![
                    pmid(
                        "31126716",
                        "IWGDF practical guidelines 2019/2023",
                        "Schaper NC et al.",
                        "Diabetes Metab Res Rev",
                        "2024",
                    ),
                    pmid(
                        "15111519",
                        "Pathogenesis and management of diabetic foot ulcers",
                        "Boulton AJM et al.",
                        "N Engl J Med",
                        "2004",
                    ),
                ],
            )
            .with_confidence(EvidenceConfidence::High),
        Slide::new("acknowledgements_contact", "Acknowledgements & Contact")
            .with_layout(LayoutHint::ImageLeft)
            .with_images(
                ["UNTH hospital building", "medical team group photo"],
                "UNTH hospital building and clinical team",
            )
            .with_bullets([
                "Burns, Plastic & Reconstructive Surgery Unit, Department of Surgery, UNTH Ituku Ozalla.",
                "Multidisciplinary Diabetic Foot Team — Surgery, Endocrinology, Vascular, Podiatry, Nursing.",
                "Contact: Department of Surgery, UNTH, PMB 01129, Enugu, Nigeria.",
            ])
            .with_notes(
                "This presentation provides educational content and does not replace clinical \
                 judgment or local institutional protocols.",
            )
            .with_confidence(EvidenceConfidence::High),
    ]
}

fn question(
    id: &str,
    question: &str,
    options: [&str; 4],
    correct_index: usize,
    explanation: &str,
    empathetic_response: &str,
) -> QuizQuestion {
    QuizQuestion {
        id: id.to_string(),
        question: question.to_string(),
        options: options.iter().map(|o| (*o).to_string()).collect(),
        correct_index,
        explanation: explanation.to_string(),
        empathetic_response: Some(empathetic_response.to_string()),
    }
}

/// The myth-busting quiz.
#[must_use]
pub fn default_quiz() -> Vec<QuizQuestion> {
    vec![
        question(
            "q1",
            "What is the PRIMARY cause of diabetic foot ulcers?",
            [
                "Spiritual attack or curse",
                "Peripheral neuropathy and peripheral arterial disease combined with hyperglycaemia",
                "Wearing the wrong type of shoes only",
                "Contact with contaminated soil",
            ],
            1,
            "DFU is caused by a combination of peripheral neuropathy, peripheral arterial disease \
             and hyperglycaemia. These are well-established biomedical mechanisms.",
            "Chronic wounds that don't heal can be frightening. Medical science has clear \
             explanations: high blood sugar damages nerves and blood vessels over time, and \
             treatment can help.",
        ),
        question(
            "q2",
            "A patient believes their foot ulcer is a \"spiritual attack\" and delays hospital visit for 4 weeks. What is the MOST LIKELY outcome?",
            [
                "The ulcer heals on its own because it was mild",
                "The delay has no effect on outcomes",
                "Higher risk of amputation, deeper infection (osteomyelitis), and worse prognosis",
                "The spiritual healer will resolve the problem",
            ],
            2,
            "Delayed presentation is consistently associated with higher Wagner grades at \
             admission, higher amputation rates, and increased mortality.",
            "We respect your beliefs, but every week of delay allows the infection to go deeper. \
             Coming to hospital early gives us the best chance of saving your foot.",
        ),
        question(
            "q3",
            "What is the BEST approach when a patient attributes their DFU to spiritual causes?",
            [
                "Ridicule the belief and insist they are wrong",
                "Ignore the belief entirely and just treat",
                "Respectfully acknowledge the belief, then clearly explain the biomedical causes and urgency of treatment",
                "Agree with the patient to maintain rapport",
            ],
            2,
            "Cultural humility is key: acknowledge the patient's perspective respectfully, then \
             give a clear, simple explanation of the medical causes.",
            "Your feelings and beliefs are important to us. Medical science shows that treatment \
             works. Let's work together to take care of your foot.",
        ),
        question(
            "q4",
            "Which community strategy has shown promise in reducing myth-driven delays?",
            [
                "Banning traditional healers",
                "Distributing free medication at churches",
                "Training religious and community leaders to deliver health messages about DFU",
                "Only treating patients who come early",
            ],
            2,
            "Engaging trusted community voices to deliver accurate health information is an \
             evidence-based strategy.",
            "When respected leaders share health facts alongside their spiritual guidance, it \
             helps people make better health decisions.",
        ),
        question(
            "q5",
            "Is there ANY scientific evidence that diabetic foot ulcers are caused by curses or spiritual forces?",
            [
                "Yes, some studies support this",
                "No — there is zero scientific evidence for spiritual causation; DFU pathophysiology is entirely biomedical",
                "The evidence is mixed",
                "Science cannot study spiritual matters",
            ],
            1,
            "Every aspect of DFU development, from neuropathy to ischaemia to infection, has \
             been explained by biomedical research.",
            "When something bad happens to our health, we look for reasons. Understanding the \
             physical causes empowers us to prevent and treat them.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn default_ids_are_unique() {
        let slides = default_slides();
        let ids: BTreeSet<&str> = slides.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), slides.len());
    }

    #[test]
    fn default_citations_unique_per_slide() {
        for slide in default_slides() {
            let ids: BTreeSet<&str> = slide.citations.iter().map(|c| c.id.as_str()).collect();
            assert_eq!(ids.len(), slide.citations.len(), "slide {}", slide.id);
        }
    }

    #[test]
    fn quiz_answers_are_valid_options() {
        let quiz = default_quiz();
        assert_eq!(quiz.len(), 5);
        for q in &quiz {
            assert!(q.correct_option().is_some(), "question {}", q.id);
        }
    }
}
