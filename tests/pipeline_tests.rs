/// Unit tests for the CSV pipeline
/// Covers the parser, the field mapper and its state machine, the
/// normalizer, and the export helpers
use leadscore_api::csv_parser::parse_csv;
use leadscore_api::errors::AppError;
use leadscore_api::export::{sort_by_score_desc, to_pretty_json};
use leadscore_api::mapping::{
    propose_mapping, CanonicalField, MappingProposal, MappingState,
};
use leadscore_api::models::Lead;
use leadscore_api::normalize::normalize_rows;
use leadscore_api::scoring::score_leads;

#[cfg(test)]
mod parser_tests {
    use super::*;

    #[test]
    fn test_basic_parse() {
        let parsed = parse_csv("name,title\nAda,CEO\nBob,Intern").unwrap();
        assert_eq!(parsed.headers, vec!["name", "title"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(
            parsed.rows[0].get("name").and_then(|v| v.as_str()),
            Some("Ada")
        );
        assert_eq!(
            parsed.rows[1].get("title").and_then(|v| v.as_str()),
            Some("Intern")
        );
    }

    #[test]
    fn test_header_only_is_malformed() {
        let err = parse_csv("name,title,company").unwrap_err();
        assert!(matches!(err, AppError::MalformedInput(_)));
    }

    #[test]
    fn test_empty_and_blank_input_is_malformed() {
        assert!(matches!(
            parse_csv("").unwrap_err(),
            AppError::MalformedInput(_)
        ));
        assert!(matches!(
            parse_csv("  \n\n   \n").unwrap_err(),
            AppError::MalformedInput(_)
        ));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let parsed = parse_csv("name,title\n\nAda,CEO\n   \nBob,Intern\n").unwrap();
        assert_eq!(parsed.rows.len(), 2);
    }

    #[test]
    fn test_whitespace_trimmed_and_quotes_stripped() {
        let parsed = parse_csv("\"Full Name\" , Title \n \"Ada Lovelace\", \"CEO\" ").unwrap();
        assert_eq!(parsed.headers, vec!["Full Name", "Title"]);
        assert_eq!(
            parsed.rows[0].get("Full Name").and_then(|v| v.as_str()),
            Some("Ada Lovelace")
        );
        assert_eq!(
            parsed.rows[0].get("Title").and_then(|v| v.as_str()),
            Some("CEO")
        );
    }

    #[test]
    fn test_short_rows_pad_with_empty() {
        let parsed = parse_csv("name,title,company\nAda,CEO").unwrap();
        assert_eq!(
            parsed.rows[0].get("company").and_then(|v| v.as_str()),
            Some("")
        );
    }

    #[test]
    fn test_extra_fields_dropped() {
        let parsed = parse_csv("name,title\nAda,CEO,Initech,extra").unwrap();
        assert_eq!(parsed.rows[0].len(), 2);
        assert_eq!(
            parsed.rows[0].get("title").and_then(|v| v.as_str()),
            Some("CEO")
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let parsed = parse_csv("name,title\r\nAda,CEO\r\n").unwrap();
        assert_eq!(parsed.headers, vec!["name", "title"]);
        assert_eq!(
            parsed.rows[0].get("title").and_then(|v| v.as_str()),
            Some("CEO")
        );
    }

    #[test]
    fn test_duplicate_headers_collide() {
        // Both columns are kept in the header list, but as row keys the
        // later column overwrites the value. Known limitation, kept as-is.
        let parsed = parse_csv("name,name\nAda,Bob").unwrap();
        assert_eq!(parsed.headers, vec!["name", "name"]);
        assert_eq!(parsed.rows[0].len(), 1);
        assert_eq!(
            parsed.rows[0].get("name").and_then(|v| v.as_str()),
            Some("Bob")
        );
    }

    #[test]
    fn test_quoted_commas_not_supported() {
        // Flat split only: the quoted comma still splits the field
        let parsed = parse_csv("name,title\n\"Lovelace, Ada\",CEO").unwrap();
        assert_eq!(
            parsed.rows[0].get("name").and_then(|v| v.as_str()),
            Some("Lovelace")
        );
    }
}

#[cfg(test)]
mod mapper_tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scenario_common_headers() {
        let mapping = propose_mapping(&headers(&["Full Name", "Job Title", "Company Name"]));
        assert_eq!(mapping.get(CanonicalField::Name), Some("Full Name"));
        assert_eq!(mapping.get(CanonicalField::Title), Some("Job Title"));
        assert_eq!(mapping.get(CanonicalField::Company), Some("Company Name"));
    }

    #[test]
    fn test_all_six_fields() {
        let mapping = propose_mapping(&headers(&[
            "Contact",
            "Position",
            "Employer",
            "Website URL",
            "E-mail",
            "Mobile",
        ]));
        assert_eq!(mapping.get(CanonicalField::Name), Some("Contact"));
        assert_eq!(mapping.get(CanonicalField::Title), Some("Position"));
        assert_eq!(mapping.get(CanonicalField::Company), Some("Employer"));
        assert_eq!(mapping.get(CanonicalField::Website), Some("Website URL"));
        assert_eq!(mapping.get(CanonicalField::Email), Some("E-mail"));
        assert_eq!(mapping.get(CanonicalField::Phone), Some("Mobile"));
    }

    #[test]
    fn test_unknown_headers_stay_unmapped() {
        let mapping = propose_mapping(&headers(&["Favorite Color", "Shoe Size"]));
        for field in CanonicalField::ALL {
            assert_eq!(mapping.get(field), None);
        }
    }

    #[test]
    fn test_priority_order_tie_break() {
        // With nothing else claiming name, "Company Name" resolves to name
        // first: the priority order is the documented tie-break policy
        let mapping = propose_mapping(&headers(&["Company Name"]));
        assert_eq!(mapping.get(CanonicalField::Name), Some("Company Name"));
        assert_eq!(mapping.get(CanonicalField::Company), None);
    }

    #[test]
    fn test_filled_field_not_reassigned() {
        let mapping = propose_mapping(&headers(&["Name", "Lead Name", "Title"]));
        assert_eq!(mapping.get(CanonicalField::Name), Some("Name"));
        // "Lead Name" stays unused; the name slot was already taken
        assert_eq!(mapping.get(CanonicalField::Title), Some("Title"));
    }

    #[test]
    fn test_second_pass_rescues_title() {
        // "Job" matches no first-pass pattern ("job title" is two words),
        // only the broader second-pass set
        let mapping = propose_mapping(&headers(&["Contact", "Job", "Company"]));
        assert_eq!(mapping.get(CanonicalField::Title), Some("Job"));
    }

    #[test]
    fn test_second_pass_skips_used_headers() {
        // "Work Email" is claimed by email in the first pass, so the second
        // pass must not hand it to title as well
        let mapping = propose_mapping(&headers(&["Work Email"]));
        assert_eq!(mapping.get(CanonicalField::Email), Some("Work Email"));
        assert_eq!(mapping.get(CanonicalField::Title), None);
    }

    #[test]
    fn test_title_can_stay_unmapped() {
        let mapping = propose_mapping(&headers(&["Full Name", "Company"]));
        assert_eq!(mapping.get(CanonicalField::Title), None);
        assert!(!mapping.has_title());
    }

    #[test]
    fn test_idempotence() {
        let hs = headers(&["Full Name", "Job Title", "Company", "Website"]);
        assert_eq!(propose_mapping(&hs), propose_mapping(&hs));
    }

    #[test]
    fn test_case_and_whitespace_insensitive_detection() {
        let mapping = propose_mapping(&headers(&["  FULL NAME  ", "JOB TITLE"]));
        assert_eq!(mapping.get(CanonicalField::Name), Some("  FULL NAME  "));
        assert_eq!(mapping.get(CanonicalField::Title), Some("JOB TITLE"));
    }
}

#[cfg(test)]
mod state_machine_tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_transitions() {
        let mut proposal = MappingProposal::propose(&headers(&["Name", "Title"]));
        assert_eq!(proposal.state(), MappingState::Proposed);

        proposal.await_confirmation();
        assert_eq!(proposal.state(), MappingState::AwaitingConfirmation);

        let confirmed = proposal.confirm().unwrap();
        assert_eq!(confirmed.get(CanonicalField::Title), Some("Title"));
    }

    #[test]
    fn test_confirm_without_title_fails() {
        let proposal = MappingProposal::propose(&headers(&["Name", "Company"]));
        let err = proposal.confirm().unwrap_err();
        assert!(matches!(err, AppError::MissingRequiredField(_)));
    }

    #[test]
    fn test_operator_override_recovers() {
        let mut proposal = MappingProposal::propose(&headers(&["Name", "Seniority"]));
        proposal.await_confirmation();
        assert!(!proposal.mapping().has_title());

        // Operator assigns the unrecognized column to title
        proposal.set(CanonicalField::Title, "Seniority");
        let confirmed = proposal.confirm().unwrap();
        assert_eq!(confirmed.get(CanonicalField::Title), Some("Seniority"));
    }

    #[test]
    fn test_operator_can_clear_a_guess() {
        let mut proposal = MappingProposal::propose(&headers(&["Company Name", "Title"]));
        assert_eq!(
            proposal.mapping().get(CanonicalField::Name),
            Some("Company Name")
        );

        proposal.clear(CanonicalField::Name);
        proposal.set(CanonicalField::Company, "Company Name");
        let confirmed = proposal.confirm().unwrap();
        assert_eq!(confirmed.get(CanonicalField::Name), None);
        assert_eq!(confirmed.get(CanonicalField::Company), Some("Company Name"));
    }

    #[test]
    fn test_surface_reports_confirmed_gate() {
        let mut proposal = MappingProposal::propose(&headers(&["Name", "Title"]));
        proposal.await_confirmation();

        let surface = proposal.surface();
        assert!(!surface.confirmed);
        assert_eq!(surface.title.as_deref(), Some("Title"));

        let confirmed = proposal.confirm().unwrap();
        assert!(confirmed.surface().confirmed);
    }
}

#[cfg(test)]
mod normalizer_tests {
    use super::*;

    fn confirmed(csv: &str) -> (Vec<leadscore_api::models::RawRow>, leadscore_api::mapping::ConfirmedMapping) {
        let parsed = parse_csv(csv).unwrap();
        let proposal = MappingProposal::propose(&parsed.headers);
        (parsed.rows, proposal.confirm().unwrap())
    }

    #[test]
    fn test_round_trip_cardinality_and_order() {
        let (rows, mapping) =
            confirmed("Full Name,Job Title,Company\nAda,CEO,Initech\nBob,Intern,Globex\nCam,VP,Acme");
        let leads = normalize_rows(&rows, &mapping);

        assert_eq!(leads.len(), 3);
        assert_eq!(leads[0].name, "Ada");
        assert_eq!(leads[1].title, "Intern");
        assert_eq!(leads[2].company, "Acme");
    }

    #[test]
    fn test_unmapped_fields_default_to_empty() {
        let (rows, mapping) = confirmed("Full Name,Job Title\nAda,CEO");
        let leads = normalize_rows(&rows, &mapping);

        assert_eq!(leads[0].website, "");
        assert_eq!(leads[0].email, "");
        assert_eq!(leads[0].phone, "");
    }

    #[test]
    fn test_source_columns_pass_through() {
        let (rows, mapping) = confirmed("Full Name,Job Title,LinkedIn\nAda,CEO,linkedin.com/in/ada");
        let leads = normalize_rows(&rows, &mapping);

        // The mapped source columns and the unrecognized one all ride along
        assert_eq!(
            leads[0].extra.get("Full Name").and_then(|v| v.as_str()),
            Some("Ada")
        );
        assert_eq!(
            leads[0].extra.get("LinkedIn").and_then(|v| v.as_str()),
            Some("linkedin.com/in/ada")
        );
    }

    #[test]
    fn test_canonical_wins_over_same_named_raw_column() {
        // A raw column literally named "title" must not clobber the value
        // the mapping selected
        let parsed = parse_csv("title,Job Title\nstale,CEO").unwrap();
        let mut proposal = MappingProposal::propose(&parsed.headers);
        proposal.set(CanonicalField::Title, "Job Title");
        let mapping = proposal.confirm().unwrap();

        let leads = normalize_rows(&parsed.rows, &mapping);
        assert_eq!(leads[0].title, "CEO");
        assert!(leads[0].extra.get("title").is_none());
        assert_eq!(
            leads[0].extra.get("Job Title").and_then(|v| v.as_str()),
            Some("CEO")
        );
    }

    #[test]
    fn test_missing_cell_becomes_empty() {
        let (rows, mapping) = confirmed("Full Name,Job Title\nAda");
        let leads = normalize_rows(&rows, &mapping);
        assert_eq!(leads[0].title, "");
    }
}

#[cfg(test)]
mod export_tests {
    use super::*;

    fn scored() -> Vec<leadscore_api::models::ScoredLead> {
        let (rows, mapping) = {
            let parsed =
                parse_csv("Full Name,Job Title\nBob,Engineer\nAda,CEO\nCam,Intern").unwrap();
            let proposal = MappingProposal::propose(&parsed.headers);
            (parsed.rows, proposal.confirm().unwrap())
        };
        score_leads(normalize_rows(&rows, &mapping))
    }

    #[test]
    fn test_sort_by_score_desc() {
        let mut leads = scored();
        sort_by_score_desc(&mut leads);

        assert_eq!(leads[0].name, "Ada");
        assert_eq!(leads[0].score, 10);
        assert_eq!(leads[2].name, "Cam");
        assert_eq!(leads[2].score, -5);
    }

    #[test]
    fn test_sort_is_stable_for_equal_scores() {
        let parsed = parse_csv("Full Name,Job Title\nBob,Engineer\nEve,Designer").unwrap();
        let proposal = MappingProposal::propose(&parsed.headers);
        let mapping = proposal.confirm().unwrap();
        let mut leads = score_leads(normalize_rows(&parsed.rows, &mapping));
        sort_by_score_desc(&mut leads);

        assert_eq!(leads[0].name, "Bob");
        assert_eq!(leads[1].name, "Eve");
    }

    #[test]
    fn test_pretty_json_field_order() {
        let leads = scored();
        let json = to_pretty_json(&leads).unwrap();

        let pos = |needle: &str| json.find(needle).unwrap();
        assert!(pos("\"name\"") < pos("\"title\""));
        assert!(pos("\"title\"") < pos("\"company\""));
        assert!(pos("\"company\"") < pos("\"website\""));
        assert!(pos("\"website\"") < pos("\"email\""));
        assert!(pos("\"email\"") < pos("\"phone\""));
        assert!(pos("\"phone\"") < pos("\"score\""));
        // Passthrough source columns come after score
        assert!(pos("\"score\"") < pos("\"Full Name\""));
    }

    #[test]
    fn test_pretty_json_parses_back() {
        let leads = scored();
        let json = to_pretty_json(&leads).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().map(|a| a.len()), Some(3));
    }
}

#[cfg(test)]
mod lead_helper_tests {
    use super::*;

    #[test]
    fn test_is_complete() {
        let mut lead = Lead {
            name: "Ada".to_string(),
            title: "CEO".to_string(),
            company: "Initech".to_string(),
            ..Default::default()
        };
        assert!(lead.is_complete());

        lead.company = "   ".to_string();
        assert!(!lead.is_complete());
    }

    #[test]
    fn test_website_href_prepends_scheme() {
        let lead = Lead {
            website: "example.com".to_string(),
            ..Default::default()
        };
        let url = lead.website_href().unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_website_href_keeps_existing_scheme() {
        let lead = Lead {
            website: "http://example.com/about".to_string(),
            ..Default::default()
        };
        let url = lead.website_href().unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn test_website_href_empty_is_none() {
        assert!(Lead::default().website_href().is_none());
    }

    #[test]
    fn test_from_value_lenient() {
        let value = serde_json::json!({
            "name": "Ada",
            "title": null,
            "company": 42,
            "Custom": "kept"
        });
        let lead = Lead::from_value(&value);
        assert_eq!(lead.name, "Ada");
        assert_eq!(lead.title, "");
        assert_eq!(lead.company, "42");
        assert_eq!(lead.extra.get("Custom").and_then(|v| v.as_str()), Some("kept"));
    }

    #[test]
    fn test_from_value_non_object() {
        let lead = Lead::from_value(&serde_json::json!("not an object"));
        assert_eq!(lead, Lead::default());
    }
}
