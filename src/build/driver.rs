use std::fmt;
use std::path::Path;

use tracing::{error, info};

use super::generators;
use crate::deps::{DependencyProvider, DependencyRequirement};
use crate::descriptor::PackageDescriptor;
use crate::error::{RecipeError, Result};
use crate::layout::{self, Layout};
use crate::settings::Settings;
use crate::toolchain::{BuildStep, ConfigureStep, Toolchain};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Configuring,
    Configured,
    Building,
    Built,
    Failed,
}

impl DriverState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DriverState::Built | DriverState::Failed)
    }
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Configure-then-build state machine for one invocation.
///
/// The driver reads the descriptor, settings and resolved requirements but
/// never changes them. `Built` and `Failed` are terminal: there is no retry.
pub struct BuildDriver<'a, T, P> {
    descriptor: &'a PackageDescriptor,
    settings: &'a Settings,
    requirements: Vec<DependencyRequirement>,
    layout: Layout,
    provider: P,
    toolchain: T,
    state: DriverState,
    history: Vec<DriverState>,
}

impl<'a, T: Toolchain, P: DependencyProvider> BuildDriver<'a, T, P> {
    pub fn new(
        descriptor: &'a PackageDescriptor,
        settings: &'a Settings,
        root: &Path,
        provider: P,
        toolchain: T,
    ) -> Self {
        Self {
            descriptor,
            settings,
            requirements: descriptor.requirements().resolve(),
            layout: layout::plan(settings).under(root),
            provider,
            toolchain,
            state: DriverState::Idle,
            history: vec![DriverState::Idle],
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Every state visited so far, starting with `Idle`.
    pub fn history(&self) -> &[DriverState] {
        &self.history
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn requirements(&self) -> &[DependencyRequirement] {
        &self.requirements
    }

    pub fn toolchain(&self) -> &T {
        &self.toolchain
    }

    /// 0 once built, 1 for anything else. A configured-only run is not a
    /// successful build.
    pub fn exit_code(&self) -> i32 {
        if self.state == DriverState::Built { 0 } else { 1 }
    }

    pub fn configure(&mut self) -> Result<()> {
        self.expect_state(DriverState::Idle, "configure")?;
        self.transition(DriverState::Configuring);

        match self.run_configure() {
            Ok(()) => {
                self.transition(DriverState::Configured);
                Ok(())
            }
            Err(cause) => {
                error!(error = %cause, "configure failed");
                self.transition(DriverState::Failed);
                Err(RecipeError::ConfigurationFailure {
                    cause: Box::new(cause),
                })
            }
        }
    }

    pub fn build(&mut self) -> Result<()> {
        self.expect_state(DriverState::Configured, "build")?;
        self.transition(DriverState::Building);

        let step = BuildStep {
            build_dir: self.layout.build.clone(),
            config: self.settings.build_type,
        };
        match self.toolchain.build(&step) {
            Ok(()) => {
                self.transition(DriverState::Built);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "build failed");
                self.transition(DriverState::Failed);
                Err(RecipeError::BuildFailure(e))
            }
        }
    }

    /// Configure, then build. Stops at the first failure.
    pub fn run(&mut self) -> Result<()> {
        self.configure()?;
        self.build()
    }

    fn run_configure(&mut self) -> Result<()> {
        let located = self.provider.locate_all(&self.requirements)?;
        let toolchain_file =
            generators::write_all(self.descriptor, self.settings, &self.layout, &located)?;

        let multi_config = self.settings.compiler.kind.is_multi_config();
        let step = ConfigureStep {
            source_dir: self.layout.source.clone(),
            build_dir: self.layout.build.clone(),
            toolchain_file,
            build_type: (!multi_config).then_some(self.settings.build_type),
        };
        self.toolchain.configure(&step)?;
        Ok(())
    }

    fn expect_state(&self, expected: DriverState, operation: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(RecipeError::IllegalState {
                operation,
                state: self.state,
            })
        }
    }

    fn transition(&mut self, next: DriverState) {
        info!(from = %self.state, to = %next, "driver transition");
        self.state = next;
        self.history.push(next);
    }
}
