use crate::declaration::ClassDeclaration;
use implgen_model::{ConstructorDescriptor, JavaType, MethodDescriptor, Modifiers, TypeKind};
use thiserror::Error;

const ACC_BRIDGE: u16 = 0x0040;
const ACC_INTERFACE: u16 = 0x0200;
const ACC_SYNTHETIC: u16 = 0x1000;
const ACC_ANNOTATION: u16 = 0x2000;
const ACC_ENUM: u16 = 0x4000;

#[derive(Debug, Error)]
pub enum ClassParseError {
    #[error("unexpected end of class file")]
    UnexpectedEof,
    #[error("invalid class file magic header")]
    InvalidMagic,
    #[error("unsupported constant pool tag {tag}")]
    UnsupportedConstant { tag: u8 },
    #[error("invalid constant pool index {index}")]
    InvalidConstantIndex { index: u16 },
    #[error("invalid modified UTF-8 string in constant pool: {0}")]
    Utf8Decode(#[from] cesu8::Cesu8DecodingError),
    #[error("malformed descriptor: {0}")]
    InvalidDescriptor(String),
}

/// Read the declaration of the type stored in `bytes`.
///
/// Fields are skipped. Synthetic methods other than bridges (lambda bodies,
/// accessors) and the static initializer never appear in the result.
pub fn parse_class(bytes: &[u8]) -> Result<ClassDeclaration, ClassParseError> {
    let mut reader = ClassReader::new(bytes);
    reader.expect_magic()?;
    let _minor_version = reader.read_u2()?;
    let _major_version = reader.read_u2()?;
    let constant_pool = ConstantPool::parse(&mut reader)?;

    let access_flags = reader.read_u2()?;
    let this_class = reader.read_u2()?;
    let super_class = reader.read_u2()?;

    let name = binary_name(&constant_pool.class_name(this_class)?);
    let superclass = if super_class == 0 {
        None
    } else {
        Some(binary_name(&constant_pool.class_name(super_class)?))
    };

    let interfaces_count = reader.read_u2()?;
    let mut interfaces = Vec::with_capacity(interfaces_count as usize);
    for _ in 0..interfaces_count {
        let index = reader.read_u2()?;
        interfaces.push(binary_name(&constant_pool.class_name(index)?));
    }

    let fields_count = reader.read_u2()?;
    for _ in 0..fields_count {
        skip_member(&mut reader)?;
    }

    let mut constructors = Vec::new();
    let mut methods = Vec::new();
    let methods_count = reader.read_u2()?;
    for _ in 0..methods_count {
        let method_flags = reader.read_u2()?;
        let name_index = reader.read_u2()?;
        let descriptor_index = reader.read_u2()?;
        let attributes_count = reader.read_u2()?;

        let member_name = constant_pool.utf8(name_index)?.to_string();
        let descriptor = constant_pool.utf8(descriptor_index)?.to_string();

        let mut exceptions = Vec::new();
        for _ in 0..attributes_count {
            let attribute_name_index = reader.read_u2()?;
            let length = reader.read_u4()? as usize;
            if constant_pool.utf8(attribute_name_index)? == "Exceptions" {
                let slice = reader.read_slice(length)?;
                let mut sub_reader = ClassReader::new(slice);
                let count = sub_reader.read_u2()?;
                for _ in 0..count {
                    let index = sub_reader.read_u2()?;
                    exceptions.push(JavaType::reference(binary_name(
                        &constant_pool.class_name(index)?,
                    )));
                }
            } else {
                reader.skip(length)?;
            }
        }

        let bridge = method_flags & ACC_BRIDGE != 0;
        if (method_flags & ACC_SYNTHETIC != 0 && !bridge) || member_name == "<clinit>" {
            continue;
        }

        let (parameters, return_type) = parse_method_descriptor(&descriptor)?;
        let modifiers = Modifiers::from_access_flags(method_flags);
        if member_name == "<init>" {
            constructors.push(ConstructorDescriptor {
                parameters,
                exceptions,
                modifiers,
            });
        } else {
            methods.push(MethodDescriptor {
                name: member_name,
                declaring_type: name.clone(),
                return_type,
                parameters,
                exceptions,
                modifiers,
            });
        }
    }

    let mut modifiers = Modifiers::from_access_flags(access_flags);
    let attributes_count = reader.read_u2()?;
    for _ in 0..attributes_count {
        let attribute_name_index = reader.read_u2()?;
        let length = reader.read_u4()? as usize;
        match constant_pool.utf8(attribute_name_index)? {
            "PermittedSubclasses" => {
                reader.skip(length)?;
                modifiers = modifiers.with(Modifiers::SEALED);
            }
            "InnerClasses" => {
                let slice = reader.read_slice(length)?;
                if let Some(flags) = inner_class_flags(slice, &constant_pool, this_class)? {
                    // Nested types keep their source modifiers (private,
                    // static, protected) only in the InnerClasses table.
                    let sealed = modifiers.bits() & Modifiers::SEALED;
                    modifiers = Modifiers::from_access_flags(flags).with(sealed);
                }
            }
            _ => reader.skip(length)?,
        }
    }

    let kind = if access_flags & ACC_ANNOTATION != 0 {
        TypeKind::Annotation
    } else if access_flags & ACC_INTERFACE != 0 {
        TypeKind::Interface
    } else if access_flags & ACC_ENUM != 0 {
        TypeKind::Enum
    } else {
        TypeKind::Class
    };

    Ok(ClassDeclaration {
        name,
        kind,
        modifiers,
        superclass,
        interfaces,
        constructors,
        methods,
    })
}

fn inner_class_flags(
    slice: &[u8],
    constant_pool: &ConstantPool,
    this_class: u16,
) -> Result<Option<u16>, ClassParseError> {
    let mut sub_reader = ClassReader::new(slice);
    let count = sub_reader.read_u2()?;
    for _ in 0..count {
        let inner_class_index = sub_reader.read_u2()?;
        sub_reader.read_u2()?; // outer_class_info_index
        sub_reader.read_u2()?; // inner_name_index
        let inner_flags = sub_reader.read_u2()?;
        if inner_class_index != 0
            && constant_pool.class_name(inner_class_index)?
                == constant_pool.class_name(this_class)?
        {
            return Ok(Some(inner_flags));
        }
    }
    Ok(None)
}

fn binary_name(internal: &str) -> String {
    internal.replace('/', ".")
}

#[derive(Debug, Clone)]
enum Constant {
    Utf8(String),
    Class { name_index: u16 },
    Other,
    Unusable,
}

struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    fn parse(reader: &mut ClassReader<'_>) -> Result<Self, ClassParseError> {
        let count = reader.read_u2()? as usize;
        let mut entries = Vec::with_capacity(count);
        entries.push(Constant::Unusable); // index 0 unused

        let mut index = 1;
        while index < count {
            let tag = reader.read_u1()?;
            let entry = match tag {
                1 => {
                    let length = reader.read_u2()? as usize;
                    let bytes = reader.read_slice(length)?;
                    Constant::Utf8(cesu8::from_java_cesu8(bytes)?.into_owned())
                }
                3 | 4 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                5 | 6 => {
                    // Long and Double take two slots.
                    reader.skip(8)?;
                    entries.push(Constant::Other);
                    index += 1;
                    Constant::Unusable
                }
                7 => {
                    let name_index = reader.read_u2()?;
                    Constant::Class { name_index }
                }
                8 | 16 | 19 | 20 => {
                    reader.read_u2()?;
                    Constant::Other
                }
                9 | 10 | 11 | 12 | 17 | 18 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                15 => {
                    reader.skip(3)?;
                    Constant::Other
                }
                other => return Err(ClassParseError::UnsupportedConstant { tag: other }),
            };

            entries.push(entry);
            index += 1;
        }

        Ok(Self { entries })
    }

    fn get(&self, index: u16) -> Result<&Constant, ClassParseError> {
        self.entries
            .get(index as usize)
            .ok_or(ClassParseError::InvalidConstantIndex { index })
    }

    fn utf8(&self, index: u16) -> Result<&str, ClassParseError> {
        match self.get(index)? {
            Constant::Utf8(value) => Ok(value.as_str()),
            _ => Err(ClassParseError::InvalidConstantIndex { index }),
        }
    }

    fn class_name(&self, index: u16) -> Result<String, ClassParseError> {
        match self.get(index)? {
            Constant::Class { name_index } => Ok(self.utf8(*name_index)?.to_string()),
            _ => Err(ClassParseError::InvalidConstantIndex { index }),
        }
    }
}

struct ClassReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ClassReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn expect_magic(&mut self) -> Result<(), ClassParseError> {
        const MAGIC: u32 = 0xCAFEBABE;
        if self.read_u4()? != MAGIC {
            return Err(ClassParseError::InvalidMagic);
        }
        Ok(())
    }

    fn read_u1(&mut self) -> Result<u8, ClassParseError> {
        let value = *self.data.get(self.pos).ok_or(ClassParseError::UnexpectedEof)?;
        self.pos += 1;
        Ok(value)
    }

    fn read_u2(&mut self) -> Result<u16, ClassParseError> {
        let bytes = self.read_slice(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn read_u4(&mut self) -> Result<u32, ClassParseError> {
        let bytes = self.read_slice(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8], ClassParseError> {
        if self.pos + len > self.data.len() {
            return Err(ClassParseError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> Result<(), ClassParseError> {
        self.read_slice(len).map(|_| ())
    }
}

fn skip_member(reader: &mut ClassReader<'_>) -> Result<(), ClassParseError> {
    reader.read_u2()?; // access_flags
    reader.read_u2()?; // name_index
    reader.read_u2()?; // descriptor_index
    let attributes_count = reader.read_u2()?;
    for _ in 0..attributes_count {
        reader.read_u2()?; // attribute_name_index
        let length = reader.read_u4()? as usize;
        reader.skip(length)?;
    }
    Ok(())
}

/// Split `(II[Ljava/lang/String;)V` into parameter and return types.
pub fn parse_method_descriptor(
    descriptor: &str,
) -> Result<(Vec<JavaType>, JavaType), ClassParseError> {
    let mut parser = DescriptorParser::new(descriptor);
    parser.expect(b'(')?;
    let mut parameters = Vec::new();
    while parser.peek()? != b')' {
        parameters.push(parser.parse_type()?);
    }
    parser.expect(b')')?;
    let return_type = if parser.peek()? == b'V' {
        parser.pos += 1;
        JavaType::Void
    } else {
        parser.parse_type()?
    };

    if parser.remaining() != 0 {
        return Err(ClassParseError::InvalidDescriptor(descriptor.to_string()));
    }

    Ok((parameters, return_type))
}

struct DescriptorParser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> DescriptorParser<'a> {
    fn new(descriptor: &'a str) -> Self {
        Self {
            bytes: descriptor.as_bytes(),
            pos: 0,
        }
    }

    fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    fn peek(&self) -> Result<u8, ClassParseError> {
        self.bytes
            .get(self.pos)
            .copied()
            .ok_or_else(|| ClassParseError::InvalidDescriptor("truncated descriptor".into()))
    }

    fn expect(&mut self, expected: u8) -> Result<(), ClassParseError> {
        if self.peek()? != expected {
            return Err(ClassParseError::InvalidDescriptor(format!(
                "expected '{}' in descriptor",
                expected as char
            )));
        }
        self.pos += 1;
        Ok(())
    }

    fn parse_type(&mut self) -> Result<JavaType, ClassParseError> {
        let tag = self.peek()?;
        let primitive = match tag {
            b'B' => "byte",
            b'C' => "char",
            b'D' => "double",
            b'F' => "float",
            b'I' => "int",
            b'J' => "long",
            b'S' => "short",
            b'Z' => "boolean",
            b'L' => return self.parse_reference_type(),
            b'[' => return self.parse_array_type(),
            _ => {
                return Err(ClassParseError::InvalidDescriptor(format!(
                    "unexpected descriptor tag '{}'",
                    tag as char
                )))
            }
        };
        self.pos += 1;
        Ok(JavaType::primitive(primitive))
    }

    fn parse_reference_type(&mut self) -> Result<JavaType, ClassParseError> {
        self.expect(b'L')?;
        let start = self.pos;
        while self.pos < self.bytes.len() && self.bytes[self.pos] != b';' {
            self.pos += 1;
        }
        if self.pos >= self.bytes.len() {
            return Err(ClassParseError::InvalidDescriptor(
                "unterminated reference descriptor".into(),
            ));
        }
        let name = String::from_utf8(self.bytes[start..self.pos].to_vec())
            .map_err(|e| ClassParseError::InvalidDescriptor(e.to_string()))?;
        self.pos += 1; // consume ';'
        Ok(JavaType::reference(binary_name(&name)))
    }

    fn parse_array_type(&mut self) -> Result<JavaType, ClassParseError> {
        let mut dimensions = 0;
        while self.remaining() > 0 && self.bytes[self.pos] == b'[' {
            dimensions += 1;
            self.pos += 1;
        }
        let element = self.parse_type()?;
        Ok(JavaType::array_of(element, dimensions))
    }
}
