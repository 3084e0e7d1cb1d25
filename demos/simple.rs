use npy_codec::{load, save, NpyArray, ReadNpyError, WriteNpyError};

fn write_example() -> Result<(), WriteNpyError> {
    let arr = NpyArray::from_vec(vec![2, 3], false, vec![1i32, 2, 3, 4, 5, 6])
        .expect("shape matches data");
    save("array.npy", &arr)
}

fn read_example() -> Result<(), ReadNpyError> {
    let arr = load("array.npy")?;
    println!(
        "{} array of shape {:?}: {:?}",
        arr.dtype(),
        arr.shape(),
        arr.to_vec::<i32>()?
    );
    Ok(())
}

fn main() {
    write_example().expect("failure writing array to file");
    read_example().expect("failure reading array from file");
}
