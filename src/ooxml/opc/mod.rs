/// Open Packaging Conventions (OPC) constants.
///
/// The exporter writes its parts as plain files and builds the content type
/// and relationship parts itself, so only the vocabulary is needed here.
pub mod constants;
