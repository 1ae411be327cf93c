use color_eyre::Report;
use gov_toolbox::gist::{update_gist, GistTarget};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct PublishCmd {
    /// Report file to upload.
    #[structopt(long)]
    input: PathBuf,

    /// Id of the Gist to patch.
    #[structopt(long, env = "GIST_ID")]
    gist_id: String,

    /// GitHub personal access token with gist scope.
    #[structopt(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: String,

    /// Filename inside the Gist to replace.
    #[structopt(long, default_value = "governance_data.json")]
    gist_filename: String,

    /// Gist description.
    #[structopt(long, default_value = "Cardano SPO governance vote tallies")]
    description: String,
}

impl PublishCmd {
    pub fn exec(self) -> Result<(), Report> {
        let content = std::fs::read_to_string(&self.input)?;
        let target = GistTarget::new(
            self.gist_id,
            self.github_token,
            self.gist_filename,
            self.description,
        );
        update_gist(&target, &content)?;
        Ok(())
    }
}
