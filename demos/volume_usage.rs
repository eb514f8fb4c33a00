//! Example: using the volume collaborator's blob storage wrapper directly.

use mini_kvstore_v2::volume::BlobStorage;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Volume Storage Example ===\n");

    let mut storage = BlobStorage::new("example_volume_data", "example-vol".to_string())?;
    println!(
        "✓ Volume storage initialized (volume_id: {})",
        storage.volume_id()
    );

    let meta1 = storage.put("user:alice:avatar", b"<binary image data>")?;
    println!(
        "✓ Stored blob: key={}, etag={}, size={} bytes",
        meta1.key, meta1.etag, meta1.size
    );

    let meta2 = storage.put("user:bob:profile", b"{\"name\": \"Bob\", \"age\": 30}")?;
    println!(
        "✓ Stored blob: key={}, etag={}, size={} bytes",
        meta2.key, meta2.etag, meta2.size
    );

    if let Some(data) = storage.get("user:bob:profile")? {
        println!("✓ Retrieved blob: {}", String::from_utf8_lossy(&data));
    }

    // Overwriting a key is last-write-wins, same as the underlying store.
    storage.put("user:alice:avatar", b"<updated binary image data>")?;
    let updated = storage.get("user:alice:avatar")?.expect("just written");
    println!("✓ Overwrote blob: {} bytes now", updated.len());

    let keys = storage.list_keys();
    println!("\n✓ Total blobs: {}", keys.len());
    for key in &keys {
        println!("  - {}", key);
    }

    let stats = storage.stats();
    println!("\n✓ Storage statistics:");
    println!("  Keys: {}", stats.num_keys);
    println!("  Segments: {}", stats.num_segments);
    println!("  Total size: {:.2} MB", stats.total_mb());

    println!("\n✓ Volume storage example completed!");

    Ok(())
}
