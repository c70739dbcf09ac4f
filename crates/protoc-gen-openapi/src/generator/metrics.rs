use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub files_registered: usize,
  pub files_skipped: usize,
  pub files_converted: usize,
  pub schemas_generated: usize,
  pub operations_converted: usize,
  pub cycles_detected: usize,
  pub cycle_details: Vec<Vec<String>>,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_registered_file(&mut self) {
    self.files_registered += 1;
  }

  pub fn record_converted_file(&mut self) {
    self.files_converted += 1;
  }

  pub fn record_skipped_file(&mut self, file: &str) {
    self.files_skipped += 1;
    self.record_warning(GenerationWarning::MissingPackage { file: file.to_string() });
  }

  pub fn record_operations(&mut self, count: usize) {
    self.operations_converted += count;
  }

  pub fn record_cycle(&mut self, cycle: Vec<String>) {
    self.cycles_detected += 1;
    self.cycle_details.push(cycle);
  }

  pub fn record_cycles(&mut self, cycles: Vec<Vec<String>>) {
    for cycle in cycles {
      self.record_cycle(cycle);
    }
  }

  pub fn record_warning(&mut self, warning: GenerationWarning) {
    self.warnings.push(warning);
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
    self.warnings.extend(warnings);
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "File '{file}' has no package declaration and was skipped")]
  MissingPackage { file: String },
  #[strum(to_string = "Method '{method}' is streaming and is documented as a unary call")]
  StreamingMethod { method: String },
}
