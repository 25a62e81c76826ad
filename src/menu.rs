use anyhow::Result;
use reqwest::Client;
use std::io::{BufRead, Write};
use tracing::info;

use crate::config::Config;
use crate::error::CheckError;
use crate::image::ImageReference;
use crate::inference::check_inference;
use crate::prompt;
use crate::registry::{fetch_manifest_status, request_pull_token, RegistryOutcome, TokenGrant};

/// Menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    ValidateKey,
    TestContainer,
    Quit,
}

impl Choice {
    /// Match a menu answer; anything unknown is `None`
    pub fn parse(answer: &str) -> Option<Self> {
        match answer.trim().to_lowercase().as_str() {
            "1" => Some(Self::ValidateKey),
            "2" => Some(Self::TestContainer),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Interactive session owning its console handles and HTTP client
///
/// Check methods return `Ok(None)` when the user backed out before a request
/// was made, otherwise whether the check succeeded. Check failures are printed,
/// only console I/O errors are returned.
pub struct Session<R, W> {
    input: R,
    output: W,
    http_client: Client,
    config: Config,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, http_client: Client, config: Config) -> Self {
        Self {
            input,
            output,
            http_client,
            config,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Show the menu until the user quits or input runs out
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let Some(answer) = prompt::read_line(&mut self.input, &mut self.output, "\nSelect > ")?
            else {
                info!("Input closed, leaving menu");
                return Ok(());
            };

            match Choice::parse(&answer) {
                Some(Choice::ValidateKey) => {
                    self.validate_key().await?;
                }
                Some(Choice::TestContainer) => {
                    self.test_container(None).await?;
                }
                Some(Choice::Quit) => return Ok(()),
                None => {}
            }
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output, "\n===============================")?;
        writeln!(self.output, "   NVIDIA NIM & REGISTRY TOOL")?;
        writeln!(self.output, "===============================")?;
        writeln!(self.output, "1. Validate API Key (Inference)")?;
        writeln!(self.output, "2. Test Container Access (Docker/NGC)")?;
        writeln!(self.output, "q. Quit")?;
        Ok(())
    }

    /// Prompt for a key and run the inference check
    pub async fn validate_key(&mut self) -> Result<Option<bool>> {
        let Some(api_key) = prompt::read_api_key(&mut self.input, &mut self.output)? else {
            return Ok(None);
        };

        writeln!(self.output, "\n--- 🔒 TESTING API KEY (Inference) ---")?;
        writeln!(
            self.output,
            "Attempting to generate text with '{}'...",
            self.config.model
        )?;

        match check_inference(&self.http_client, &self.config, &api_key).await {
            Ok(outcome) => {
                writeln!(self.output, "\n{}", outcome)?;
                Ok(Some(outcome.is_success()))
            }
            Err(err) => {
                self.print_check_error(&err)?;
                Ok(Some(false))
            }
        }
    }

    /// Prompt for a key (and the image unless given) and run the registry check
    pub async fn test_container(&mut self, image: Option<String>) -> Result<Option<bool>> {
        let Some(api_key) = prompt::read_api_key(&mut self.input, &mut self.output)? else {
            return Ok(None);
        };

        writeln!(self.output, "\n--- 🐳 TESTING CONTAINER ACCESS ---")?;
        let container_uri = match image {
            Some(image) => image.trim().to_string(),
            None => {
                writeln!(self.output, "Enter the full container URI you want to test.")?;
                writeln!(self.output, "Example: nvcr.io/nvidia/tensorrt:24.03-py3")?;
                prompt::read_line(&mut self.input, &mut self.output, "Container > ")?
                    .unwrap_or_default()
            }
        };
        if container_uri.is_empty() {
            writeln!(self.output, "Error: No container name provided.")?;
            return Ok(None);
        }

        let image = ImageReference::parse(&container_uri);
        writeln!(self.output, "\nChecking permissions for:")?;
        writeln!(self.output, "   Repo: {}", image.repository)?;
        writeln!(self.output, "   Tag:  {}", image.tag)?;
        writeln!(self.output, "\n1. Authenticating with NGC Registry...")?;

        let token = match request_pull_token(&self.http_client, &self.config, &api_key, &image)
            .await
        {
            Ok(TokenGrant::Granted(token)) => token,
            Ok(TokenGrant::Rejected) => {
                writeln!(self.output, "{}", RegistryOutcome::AuthRejected)?;
                return Ok(Some(false));
            }
            Ok(TokenGrant::Failed(status)) => {
                writeln!(self.output, "{}", RegistryOutcome::AuthFailed { status })?;
                return Ok(Some(false));
            }
            Err(err) => {
                self.print_check_error(&err)?;
                return Ok(Some(false));
            }
        };

        writeln!(self.output, "✅ AUTH SUCCESS: Your key is valid for NGC.")?;
        writeln!(self.output, "2. Verifying if image '{}' exists...", image.tag)?;

        match fetch_manifest_status(&self.http_client, &self.config, &token, &image).await {
            Ok(status) => {
                let outcome = RegistryOutcome::from_manifest_status(status, &image);
                writeln!(self.output, "\n{}", outcome)?;
                Ok(Some(outcome.is_success()))
            }
            Err(err) => {
                self.print_check_error(&err)?;
                Ok(Some(false))
            }
        }
    }

    fn print_check_error(&mut self, err: &CheckError) -> Result<()> {
        match err {
            CheckError::Connection(_) => writeln!(self.output, "\n❌ CONNECTION ERROR: {}", err)?,
            CheckError::InvalidTokenResponse(_) => writeln!(self.output, "\n❌ ERROR: {}", err)?,
        }
        Ok(())
    }
}
