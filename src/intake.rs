//! Interactive intake: walks the wizard on the terminal.

use crate::prompt::Prompter;
use chrono::Local;
use frontdesk_client::FrontDeskClient;
use frontdesk_core::master::{self, HealthVital};
use frontdesk_core::steps::{
    AddressForm, ContactForm, IdentityForm, IntakeStep, ProfileForm, VitalEntry, VitalsForm,
    age_description,
};
use frontdesk_core::{CurrentPatient, Desk, IntakeWizard, MasterDataApi, Navigation, WizardStep};

/// Drop-down options, loaded once before the wizard starts.
#[derive(Default)]
pub struct Lookups {
    genders: Vec<(String, String)>,
    identity_types: Vec<(String, String)>,
    address_types: Vec<(String, String)>,
    states: Vec<(String, String)>,
    health_vitals: Vec<HealthVital>,
}

impl Lookups {
    /// Loads every list concurrently. A list that fails to load is left empty.
    pub async fn load(api: &dyn MasterDataApi) -> Self {
        let (genders, identity_types, address_types, health_vitals) = tokio::join!(
            api.genders(),
            api.identity_types(),
            api.address_types(),
            api.health_vitals(),
        );

        fn or_empty<T>(list: &str, result: frontdesk_core::BackendResult<Vec<T>>) -> Vec<T> {
            result.unwrap_or_else(|err| {
                tracing::warn!("could not load {list}: {err}");
                Vec::new()
            })
        }

        Self {
            genders: or_empty("genders", genders)
                .into_iter()
                .map(|g| (g.gender_code, g.gender_name))
                .collect(),
            identity_types: or_empty("identity types", identity_types)
                .into_iter()
                .map(|t| (t.identity_type_code, t.identity_type_name))
                .collect(),
            address_types: or_empty("address types", address_types)
                .into_iter()
                .map(|t| (t.address_type_code, t.address_type_name))
                .collect(),
            states: master::states()
                .into_iter()
                .map(|s| (s.state_code, s.state_name))
                .collect(),
            health_vitals: or_empty("health vitals", health_vitals),
        }
    }
}

/// Form values kept for the whole run so a failed save never loses what was typed.
struct Drafts {
    profile: ProfileForm,
    identity: IdentityForm,
    address: AddressForm,
    contact: ContactForm,
    vitals: VitalsForm,
}

impl Drafts {
    fn from_patient(patient: &CurrentPatient) -> Self {
        Self {
            profile: ProfileForm::from_patient(patient),
            identity: IdentityForm::from_patient(patient),
            address: AddressForm::from_patient(patient),
            contact: ContactForm::from_patient(patient),
            vitals: VitalsForm::default(),
        }
    }

    fn form(&self, step: WizardStep) -> &dyn IntakeStep {
        match step {
            WizardStep::Profile => &self.profile,
            WizardStep::Identity => &self.identity,
            WizardStep::Address => &self.address,
            WizardStep::Contact => &self.contact,
            WizardStep::HealthVitals => &self.vitals,
        }
    }
}

/// Runs the wizard until it completes or is abandoned.
pub async fn run(
    prompter: &mut Prompter,
    api: &FrontDeskClient,
    desk: &Desk,
    patient: &mut CurrentPatient,
    lookups: &Lookups,
) -> anyhow::Result<Navigation> {
    let mut wizard = IntakeWizard::new();
    let mut drafts = Drafts::from_patient(patient);
    let mut last = Navigation::Moved(WizardStep::Profile);

    while let Some(step) = wizard.current() {
        println!(
            "\n== Step {} of {}: {step} ==",
            step.index() + 1,
            WizardStep::ALL.len()
        );
        edit_step(prompter, step, &mut drafts, patient, lookups)?;

        let action = prompter.ask("Save and continue? [y]es / [b]ack / [e]dit again", "y")?;
        match action.to_ascii_lowercase().as_str() {
            "b" | "back" => {
                last = wizard.back();
                continue;
            }
            "e" | "edit" => continue,
            _ => {}
        }

        match wizard.submit(drafts.form(step), api, patient, desk).await {
            Ok(navigation) => {
                if let Navigation::Stayed(_) = navigation {
                    println!("  Not saved. Review the values and try again.");
                }
                last = navigation;
            }
            Err(errors) => {
                for (field, message) in errors.iter() {
                    println!("  {field}: {message}");
                }
            }
        }
    }

    Ok(last)
}

fn edit_step(
    prompter: &mut Prompter,
    step: WizardStep,
    drafts: &mut Drafts,
    patient: &CurrentPatient,
    lookups: &Lookups,
) -> anyhow::Result<()> {
    match step {
        WizardStep::Profile => {
            let form = &mut drafts.profile;
            form.first_name = prompter.ask("First name", &form.first_name)?;
            form.middle_name = prompter.ask("Middle name", &form.middle_name)?;
            form.last_name = prompter.ask("Last name", &form.last_name)?;
            form.gender_code = prompter.choose("Gender", &lookups.genders, &form.gender_code)?;
            form.date_of_birth = prompter.ask_date("Date of birth", form.date_of_birth)?;
        }
        WizardStep::Identity => {
            let form = &mut drafts.identity;
            form.identity_type_code = prompter.choose(
                "Identity type",
                &lookups.identity_types,
                &form.identity_type_code,
            )?;
            form.identity_number = prompter.ask("Identity number", &form.identity_number)?;
            form.issued_by = prompter.ask("Issued by", &form.issued_by)?;
            form.place_issued = prompter.ask("Place issued", &form.place_issued)?;
            form.expiry = prompter.ask_date("Expiry", form.expiry)?;
        }
        WizardStep::Address => {
            let form = &mut drafts.address;
            form.address_type_code = prompter.choose(
                "Address type",
                &lookups.address_types,
                &form.address_type_code,
            )?;
            form.address_line1 = prompter.ask("Address line 1", &form.address_line1)?;
            form.address_line2 = prompter.ask("Address line 2", &form.address_line2)?;
            form.address_line3 = prompter.ask("Address line 3", &form.address_line3)?;
            form.city = prompter.ask("City", &form.city)?;
            form.pincode = prompter.ask("Pincode", &form.pincode)?;
            form.state_code = prompter.choose("State", &lookups.states, &form.state_code)?;
        }
        WizardStep::Contact => {
            let form = &mut drafts.contact;
            form.mobile_phone = prompter.ask("Mobile phone", &form.mobile_phone)?;
            form.home_phone = prompter.ask("Home phone", &form.home_phone)?;
            form.other_phone = prompter.ask("Other phone", &form.other_phone)?;
            form.email_address = prompter.ask("Email address", &form.email_address)?;
        }
        WizardStep::HealthVitals => {
            if let Some(dob) = patient.profile.as_ref().and_then(|p| p.birth_date()) {
                let age = age_description(dob, Local::now().date_naive());
                if !age.is_empty() {
                    println!("  Age: {age}");
                }
            }
            edit_vitals(prompter, &mut drafts.vitals, &lookups.health_vitals)?;
        }
    }
    Ok(())
}

fn edit_vitals(
    prompter: &mut Prompter,
    form: &mut VitalsForm,
    vitals: &[HealthVital],
) -> anyhow::Result<()> {
    if vitals.is_empty() {
        let initial: Vec<String> = form
            .entries
            .iter()
            .map(|e| format!("{}={}", e.type_code, e.value))
            .collect();
        let answer = prompter.ask("Vitals as CODE=VALUE, comma separated", &initial.join(", "))?;
        form.entries = answer
            .split(',')
            .filter_map(|pair| pair.split_once('='))
            .map(|(code, value)| VitalEntry::new(code.trim(), value.trim()))
            .collect();
        return Ok(());
    }

    let mut entries = Vec::with_capacity(vitals.len());
    for vital in vitals {
        let initial = form
            .entries
            .iter()
            .find(|e| e.type_code == vital.health_vital_code)
            .map(|e| e.value.clone())
            .unwrap_or_default();
        let label = if vital.health_vital_unit.is_empty() {
            vital.health_vital_name.clone()
        } else {
            format!("{} ({})", vital.health_vital_name, vital.health_vital_unit)
        };
        let value = prompter.ask(&label, &initial)?;
        entries.push(VitalEntry::new(vital.health_vital_code.clone(), value));
    }
    form.entries = entries;
    Ok(())
}
