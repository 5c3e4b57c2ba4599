pub mod knowledge_bases;
