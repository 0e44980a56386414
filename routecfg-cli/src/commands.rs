//! Command handlers: load the config, run one core operation, save.

use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use routecfg_core::{
    ConfigDocument, ConfigStore, HttpModelLister, ModelRef, Provider, ProviderModelRegistry,
    RemoteModelSync, RouterResolver, SyncOutcome,
};
use tracing::debug;

use crate::cli::{AddTarget, Command, DeleteTarget, InitArgs};
use crate::ui;

/// I/O handles and storage for a single command invocation.
pub struct Session<'a> {
    store: ConfigStore,
    out: &'a mut dyn Write,
    input: &'a mut dyn BufRead,
}

impl<'a> Session<'a> {
    pub fn new(store: ConfigStore, out: &'a mut dyn Write, input: &'a mut dyn BufRead) -> Self {
        Self { store, out, input }
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        debug!(?command, config = %self.store.path().display(), "Running command");
        match command {
            Command::Ls { model } => self.list_models(model.as_deref()),
            Command::Show => self.show_routers(),
            Command::Init(args) => self.init(args),
            Command::Change { role, model } => {
                let mut doc = self.load()?;
                let assignment = RouterResolver::new(&mut doc).set_from_ref(role, &model)?;
                self.save(&doc)?;
                writeln!(self.out, "Updated {} router to: {}", role, assignment)?;
                Ok(())
            }
            Command::Unset { role } => {
                let mut doc = self.load()?;
                match RouterResolver::new(&mut doc).delete(role)? {
                    Some(_) => {
                        self.save(&doc)?;
                        writeln!(self.out, "Removed {} router", role)?;
                    }
                    None => writeln!(self.out, "{} router is already unset", role)?,
                }
                Ok(())
            }
            Command::Threshold { value } => {
                let mut doc = self.load()?;
                RouterResolver::new(&mut doc).set_long_context_threshold(value)?;
                self.save(&doc)?;
                writeln!(self.out, "Set longContext threshold to {}", value)?;
                Ok(())
            }
            Command::Add { target } => self.add(target),
            Command::Delete { target } => self.delete(target),
            Command::Update { provider, timeout } => {
                let lister = HttpModelLister::with_timeout(Duration::from_secs(timeout));
                self.update(provider.as_deref(), &lister).await
            }
        }
    }

    fn load(&self) -> Result<ConfigDocument> {
        self.store
            .load()
            .with_context(|| format!("Failed to load {}", self.store.path().display()))
    }

    fn save(&self, doc: &ConfigDocument) -> Result<()> {
        self.store
            .save(doc)
            .with_context(|| format!("Failed to save {}", self.store.path().display()))
    }

    fn list_models(&mut self, model: Option<&str>) -> Result<()> {
        let mut doc = self.load()?;
        if let Some(model) = model {
            let providers = ProviderModelRegistry::new(&mut doc).providers_offering(model);
            if providers.is_empty() {
                writeln!(self.out, "No provider offers model '{}'", model)?;
            } else {
                writeln!(self.out, "{}: {}", model, providers.join(", "))?;
            }
            return Ok(());
        }
        if doc.provider_count() == 0 {
            writeln!(self.out, "No providers or models found in config")?;
            return Ok(());
        }
        ui::models_table(&doc).render(self.out)?;
        Ok(())
    }

    fn show_routers(&mut self) -> Result<()> {
        let doc = self.load()?;
        ui::routers_table(&doc).render(self.out)?;
        Ok(())
    }

    fn init(&mut self, args: InitArgs) -> Result<()> {
        if self.store.exists() && !args.force {
            bail!(
                "{} already exists; pass --force to overwrite it",
                self.store.path().display()
            );
        }
        let doc = ConfigDocument::with_default(
            args.provider.as_str(),
            Provider::new(args.base_url, args.api_key),
            args.model.as_str(),
        )?;
        self.save(&doc)?;
        writeln!(
            self.out,
            "Created {} with default router {},{}",
            self.store.path().display(),
            args.provider,
            args.model
        )?;
        Ok(())
    }

    fn add(&mut self, target: AddTarget) -> Result<()> {
        let mut doc = self.load()?;
        match target {
            AddTarget::Provider {
                id,
                base_url,
                api_key,
            } => {
                ProviderModelRegistry::new(&mut doc).add_provider(&id, &base_url, &api_key)?;
                self.save(&doc)?;
                writeln!(self.out, "Added provider: {} ({})", id, base_url)?;
            }
            AddTarget::Model { provider, model } => {
                ProviderModelRegistry::new(&mut doc).add_model(&provider, &model)?;
                self.save(&doc)?;
                writeln!(self.out, "Added model '{}' to provider '{}'", model, provider)?;
            }
        }
        Ok(())
    }

    fn delete(&mut self, target: DeleteTarget) -> Result<()> {
        let mut doc = self.load()?;
        match target {
            DeleteTarget::Provider { id, yes } => {
                doc.provider(&id)?;
                if !yes && !ui::confirm(self.out, self.input)? {
                    writeln!(self.out, "Deletion cancelled")?;
                    return Ok(());
                }
                ProviderModelRegistry::new(&mut doc).delete_provider(&id)?;
                self.save(&doc)?;
                writeln!(self.out, "Deleted provider: {}", id)?;
            }
            DeleteTarget::Model { model, yes } => {
                let provider = model.resolve_provider(&doc)?;
                let model = ModelRef::qualified(provider, model.model);
                if !yes && !ui::confirm(self.out, self.input)? {
                    writeln!(self.out, "Deletion cancelled")?;
                    return Ok(());
                }
                let provider = model.provider.as_deref().unwrap_or_default();
                let cleared = ProviderModelRegistry::new(&mut doc).delete_model(provider, &model.model)?;
                self.save(&doc)?;
                writeln!(self.out, "Deleted model: {}", model)?;
                for role in cleared {
                    writeln!(self.out, "Cleared {} router", role)?;
                }
            }
        }
        Ok(())
    }

    async fn update(
        &mut self,
        provider: Option<&str>,
        lister: &dyn routecfg_core::ModelLister,
    ) -> Result<()> {
        let mut doc = self.load()?;
        let before = doc.clone();

        if let Some(provider) = provider {
            let added = RemoteModelSync::new(&mut doc, lister)
                .sync_provider(provider)
                .await?;
            if doc != before {
                self.save(&doc)?;
            }
            if added.is_empty() {
                writeln!(self.out, "{}: no new models", provider)?;
            } else {
                writeln!(self.out, "{}: added {}", provider, added.join(", "))?;
            }
            return Ok(());
        }

        if doc.provider_count() == 0 {
            writeln!(self.out, "No providers found in config")?;
            return Ok(());
        }

        let reports = RemoteModelSync::new(&mut doc, lister).sync_all().await;
        if doc != before {
            self.save(&doc)?;
        }
        ui::sync_table(&reports).render(self.out)?;

        let failed = reports
            .iter()
            .filter(|r| matches!(r.outcome, SyncOutcome::Failed(_)))
            .count();
        if failed > 0 {
            bail!("{} provider(s) failed to sync", failed);
        }
        Ok(())
    }
}
