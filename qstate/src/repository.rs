//! Repositório de estados nomeados

use num_complex::Complex64;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::config::RepositoryConfig;
use crate::error::{QuantumError, QuantumResult};
use crate::operator::Operator;
use crate::persist;
use crate::state::{Measurement, QuantumState};

/// Coleção de estados indexada por id, em ordem de inserção
#[derive(Debug, Clone, Default)]
pub struct StateRepository {
    /// Estados por id
    entries: HashMap<String, QuantumState>,
    /// Ids em ordem de inserção
    order: Vec<String>,
    /// Configuração
    config: RepositoryConfig,
}

/// Entrada ignorada durante `load`
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntry {
    /// Posição no array do arquivo
    pub index: usize,
    /// Id, se a entrada chegou a ter um
    pub id: Option<String>,
    /// Motivo
    pub reason: String,
}

/// Resumo de um `load`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedEntry>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} states loaded", self.loaded)?;
        if !self.skipped.is_empty() {
            write!(f, ", {} skipped", self.skipped.len())?;
            for entry in &self.skipped {
                write!(f, "\n - entry {}", entry.index)?;
                if let Some(id) = &entry.id {
                    write!(f, " ('{id}')")?;
                }
                write!(f, ": {}", entry.reason)?;
            }
        }
        Ok(())
    }
}

impl StateRepository {
    /// Cria repositório vazio com configuração padrão
    pub fn new() -> Self {
        Self::with_config(RepositoryConfig::default())
    }

    /// Cria repositório com configuração customizada
    pub fn with_config(config: RepositoryConfig) -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Ids em ordem de inserção
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Estados em ordem de inserção
    pub fn iter(&self) -> impl Iterator<Item = &QuantumState> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Adiciona um estado; `basis = None` usa a base padrão da configuração
    pub fn add(
        &mut self,
        id: &str,
        vector: Vec<Complex64>,
        basis: Option<&str>,
    ) -> QuantumResult<()> {
        if self.contains(id) {
            return Err(QuantumError::DuplicateId(id.to_string()));
        }
        let basis = basis.unwrap_or(self.config.default_basis.as_str()).to_string();
        let state = QuantumState::with_tolerance(id, vector, basis, self.config.tolerance())?;
        tracing::debug!(id, dimension = state.dimension(), "state added");
        self.insert(state);
        Ok(())
    }

    /// Estado pelo id, ou `None`
    pub fn get(&self, id: &str) -> Option<&QuantumState> {
        self.entries.get(id)
    }

    /// Como [`get`](Self::get), mas ausência vira `UnknownId`
    pub fn require(&self, id: &str) -> QuantumResult<&QuantumState> {
        self.get(id)
            .ok_or_else(|| QuantumError::UnknownId(id.to_string()))
    }

    /// Remove e devolve o estado
    pub fn remove(&mut self, id: &str) -> QuantumResult<QuantumState> {
        let state = self
            .entries
            .remove(id)
            .ok_or_else(|| QuantumError::UnknownId(id.to_string()))?;
        self.order.retain(|k| k != id);
        tracing::debug!(id, "state removed");
        Ok(state)
    }

    /// Representação textual de cada estado; `None` se o repositório está vazio
    pub fn list(&self) -> Option<Vec<String>> {
        if self.is_empty() {
            return None;
        }
        Some(self.iter().map(ToString::to_string).collect())
    }

    /// Aplica `operator` ao estado `id` e guarda o resultado
    ///
    /// Com `new_id` o resultado é gravado sob esse id, sobrescrevendo o que
    /// existir. Sem ele usa `"{id}_{operador}"`, acrescentando `_1`, `_2`, ...
    /// até achar um id livre.
    pub fn apply(
        &mut self,
        id: &str,
        operator: &Operator,
        new_id: Option<&str>,
    ) -> QuantumResult<&QuantumState> {
        let source = self.require(id)?;
        let result = operator.apply_with_tolerance(source, self.config.tolerance())?;

        let target = match new_id {
            Some(explicit) => explicit.to_string(),
            None => self.free_id(result.id()),
        };
        let overwritten = self.contains(&target);
        tracing::debug!(
            source = id,
            operator = operator.name(),
            target = %target,
            overwritten,
            "operator applied"
        );

        self.insert(result.with_id(target.clone()));
        self.require(&target)
    }

    /// Constrói um operador com a validação configurada e o aplica
    pub fn apply_matrix(
        &mut self,
        id: &str,
        name: &str,
        matrix: Vec<Vec<Complex64>>,
        new_id: Option<&str>,
    ) -> QuantumResult<&QuantumState> {
        let operator =
            Operator::with_validation(name, matrix, self.config.validation, self.config.tolerance())?;
        self.apply(id, &operator, new_id)
    }

    /// Probabilidades do estado `id`
    pub fn measure(&self, id: &str) -> QuantumResult<Measurement> {
        Ok(self.require(id)?.measure())
    }

    /// Remove todos os estados
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Grava todos os estados em `path`
    pub fn save(&self, path: impl AsRef<Path>) -> QuantumResult<()> {
        let path = path.as_ref();
        let json = persist::encode(self.iter()).map_err(|e| QuantumError::persistence(path, e))?;
        persist::write_atomic(path, json.as_bytes())?;
        tracing::info!(path = %path.display(), states = self.len(), "states saved");
        Ok(())
    }

    /// Substitui o conteúdo do repositório pelo de `path`
    ///
    /// Se o arquivo não puder ser lido como array JSON nada é alterado. Caso
    /// contrário o repositório é esvaziado e cada entrada inválida é ignorada
    /// e registrada no [`LoadReport`].
    pub fn load(&mut self, path: impl AsRef<Path>) -> QuantumResult<LoadReport> {
        let path = path.as_ref();
        let entries = persist::read_entries(path)?;

        self.clear();
        let mut report = LoadReport::default();

        for (index, value) in entries.into_iter().enumerate() {
            let raw_id = value
                .get("id")
                .and_then(|v| v.as_str())
                .map(str::to_string);

            match self.load_entry(value) {
                Ok(()) => report.loaded += 1,
                Err(reason) => {
                    tracing::warn!(
                        path = %path.display(),
                        index,
                        id = raw_id.as_deref().unwrap_or("?"),
                        %reason,
                        "skipping invalid entry"
                    );
                    report.skipped.push(SkippedEntry {
                        index,
                        id: raw_id,
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            path = %path.display(),
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "states loaded"
        );
        Ok(report)
    }

    fn load_entry(&mut self, value: serde_json::Value) -> Result<(), String> {
        let stored = persist::decode_entry(value).map_err(|e| e.to_string())?;
        if self.contains(&stored.id) {
            return Err(QuantumError::DuplicateId(stored.id).to_string());
        }
        let state = stored
            .into_state(&self.config.default_basis, self.config.tolerance())
            .map_err(|e| e.to_string())?;
        self.insert(state);
        Ok(())
    }

    /// Insere mantendo a posição de um id já existente
    fn insert(&mut self, state: QuantumState) {
        let id = state.id().to_string();
        if self.entries.insert(id.clone(), state).is_none() {
            self.order.push(id);
        }
    }

    /// Primeiro id livre entre `base`, `base_1`, `base_2`, ...
    fn free_id(&self, base: &str) -> String {
        if !self.contains(base) {
            return base.to_string();
        }
        (1usize..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}
