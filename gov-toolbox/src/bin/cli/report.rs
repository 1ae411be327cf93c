use color_eyre::Report;
use gov_toolbox::client::KoiosClient;
use gov_toolbox::config::FetchConfig;
use gov_toolbox::{proposals, registry, report, votes};
use std::fs::File;
use std::path::PathBuf;
use structopt::StructOpt;
use tally_lib::{tally_proposals, Proposal, VoterRole};
use tracing::{info, warn};

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct ReportCmd {
    /// Koios API base URL.
    #[structopt(long, env = "KOIOS_BASE", default_value = "https://api.koios.rest/api/v1")]
    koios_base_url: String,

    /// Path for the JSON report.
    #[structopt(long, default_value = "governance_data.json")]
    json_output: PathBuf,

    /// Optional path for a CSV rendering of the per-proposal rows.
    #[structopt(long)]
    csv_output: Option<PathBuf>,
}

impl ReportCmd {
    pub fn exec(self) -> Result<(), Report> {
        let config = FetchConfig {
            base_url: self.koios_base_url.clone(),
            ..FetchConfig::default()
        };
        let client = KoiosClient::new(config)?;

        let pools = registry::load_registry(&client)?;
        let entities = registry::entities(&pools);

        let proposal_rows = proposals::load_open_proposals(&client)?;
        let core_proposals: Vec<Proposal> =
            proposal_rows.iter().map(|row| row.to_proposal()).collect();

        // Per-proposal fetches are independent: one proposal's loader
        // failure degrades that proposal to an empty/default dataset instead
        // of aborting the batch.
        let mut votes_per_proposal = Vec::with_capacity(proposal_rows.len());
        let mut summaries = Vec::with_capacity(proposal_rows.len());
        for row in &proposal_rows {
            let proposal_votes = match votes::load_votes(&client, &row.proposal_id) {
                Ok(records) => records,
                Err(err) => {
                    warn!(proposal_id = %row.proposal_id, %err, "vote fetch failed, tallying defaults only");
                    Vec::new()
                }
            };
            votes_per_proposal.push(proposal_votes);

            let summary = match proposals::load_voting_summary(&client, &row.proposal_id) {
                Ok(summary) => summary,
                Err(err) => {
                    warn!(proposal_id = %row.proposal_id, %err, "voting summary fetch failed");
                    Default::default()
                }
            };
            summaries.push(summary);
        }

        let outcomes = tally_proposals(
            &core_proposals,
            &entities,
            &votes_per_proposal,
            VoterRole::Spo,
        );

        let rows = report::assemble(&proposal_rows, &summaries, &votes_per_proposal, &outcomes);
        let full_report = report::new_report(rows);

        report::write_json(&full_report, File::create(&self.json_output)?)?;
        info!(
            proposals = full_report.proposals.len(),
            pools = entities.len(),
            path = %self.json_output.display(),
            "report written"
        );

        if let Some(path) = self.csv_output {
            report::write_csv(&full_report.proposals, File::create(&path)?)?;
            info!(path = %path.display(), "csv written");
        }

        Ok(())
    }
}
