pub fn answer_fixture() -> &'static str {
    return r#"
The refund policy allows returns within 30 days.

```python
def days_left(purchased):
    return 30 - purchased
```

Contact support for anything else.
"#
    .trim();
}

pub fn documents_fixture() -> &'static str {
    return r#"[
  {
    "id": 1,
    "filename": "handbook.pdf",
    "file_type": "pdf",
    "upload_date": "2024-03-01T09:15:00.123456",
    "num_chunks": 42
  },
  {
    "id": 2,
    "filename": "notes.md",
    "file_type": "md",
    "upload_date": "2024-03-02T18:00:00",
    "num_chunks": 3
  },
  {
    "id": 7,
    "filename": "policy.docx",
    "file_type": "docx",
    "upload_date": "2024-03-05T08:00:00Z",
    "num_chunks": 11
  }
]"#;
}

pub fn query_response_fixture() -> &'static str {
    return r#"{
  "answer": "Returns are accepted within **30 days**.",
  "sources": [
    {
      "source_number": 1,
      "filename": "policy.docx",
      "chunk_index": 4,
      "content_preview": "Customers may return any item within 30 days of purchase..."
    },
    {
      "source_number": 2,
      "filename": "handbook.pdf",
      "chunk_index": 0,
      "content_preview": "Refunds are issued to the original payment method."
    }
  ]
}"#;
}
